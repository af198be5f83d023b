//! Auction and bid models

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Auction entity as persisted in the `auctions` collection
///
/// `current_bid` always equals the amount of the highest accepted bid, or
/// `starting_price` while `bids` is empty. `bids` is append-only; insertion
/// order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub starting_price: f64,
    pub minimum_increment: f64,
    pub current_bid: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub end_time: DateTime<Utc>,
    pub image_url: Option<String>,
    pub seller_id: ObjectId,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub bids: Vec<Bid>,
}

impl Auction {
    /// Build a fresh auction from validated creation data
    ///
    /// The listing opens with no bids and `current_bid` pinned to the
    /// starting price.
    pub fn new(data: NewAuction, seller_id: ObjectId) -> Self {
        Self {
            id: None,
            title: data.title,
            description: data.description,
            starting_price: data.starting_price,
            minimum_increment: data.minimum_increment,
            current_bid: data.starting_price,
            end_time: data.end_time,
            image_url: data.image_url,
            seller_id,
            created_at: Utc::now(),
            bids: Vec::new(),
        }
    }

    /// Whether the auction is still open for bidding at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.end_time > now
    }
}

/// Validated auction creation payload
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub title: String,
    pub description: String,
    pub starting_price: f64,
    pub minimum_increment: f64,
    pub end_time: DateTime<Utc>,
    pub image_url: Option<String>,
}

/// A single bid, embedded in its auction's `bids` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub user_id: ObjectId,
    pub amount: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub time: DateTime<Utc>,
}

impl Bid {
    /// Build a bid stamped with the server clock
    pub fn new(user_id: ObjectId, amount: f64) -> Self {
        Self {
            user_id,
            amount,
            time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mongodb::bson;

    fn sample_new_auction() -> NewAuction {
        NewAuction {
            title: "Vintage camera".to_string(),
            description: "Working condition".to_string(),
            starting_price: 100.0,
            minimum_increment: 5.0,
            end_time: Utc::now() + Duration::days(7),
            image_url: None,
        }
    }

    #[test]
    fn new_auction_opens_at_starting_price_with_no_bids() {
        let auction = Auction::new(sample_new_auction(), ObjectId::new());
        assert_eq!(auction.current_bid, auction.starting_price);
        assert!(auction.bids.is_empty());
        assert!(auction.id.is_none());
    }

    #[test]
    fn auction_open_state_is_time_driven() {
        let mut auction = Auction::new(sample_new_auction(), ObjectId::new());
        let now = Utc::now();

        assert!(auction.is_open_at(now));

        auction.end_time = now - Duration::seconds(1);
        assert!(!auction.is_open_at(now));

        // end_time == now is already closed; bidding requires a strictly
        // future end time
        auction.end_time = now;
        assert!(!auction.is_open_at(now));
    }

    #[test]
    fn auction_serializes_with_stored_document_keys() {
        let seller = ObjectId::new();
        let auction = Auction::new(sample_new_auction(), seller);
        let doc = bson::to_document(&auction).unwrap();

        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_f64("starting_price").unwrap(), 100.0);
        assert_eq!(doc.get_f64("current_bid").unwrap(), 100.0);
        assert_eq!(doc.get_object_id("seller_id").unwrap(), seller);
        assert!(doc.get_datetime("end_time").is_ok());
        assert!(doc.get_array("bids").unwrap().is_empty());
        // image_url is stored explicitly, null when absent
        assert!(doc.get("image_url").is_some());
    }

    #[test]
    fn bid_serializes_with_stored_document_keys() {
        let bidder = ObjectId::new();
        let bid = Bid::new(bidder, 150.0);
        let doc = bson::to_document(&bid).unwrap();

        assert_eq!(doc.get_object_id("user_id").unwrap(), bidder);
        assert_eq!(doc.get_f64("amount").unwrap(), 150.0);
        assert!(doc.get_datetime("time").is_ok());
    }
}
