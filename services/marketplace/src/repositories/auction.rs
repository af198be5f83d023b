//! Auction repository for document-store operations
//!
//! Reads that feed responses return raw documents so the wire adapter can
//! normalize identifiers and timestamps; the bid path reads typed.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::{Collection, Database};
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

use crate::models::{Auction, Bid};

/// Result of the conditional bid update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// The bid won the update and is now the highest
    Accepted,
    /// The stored current_bid was no longer below the amount at write time
    Outpaced,
}

/// Auction repository
#[derive(Clone)]
pub struct AuctionRepository {
    collection: Collection<Document>,
}

impl AuctionRepository {
    /// Create a new auction repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<Document>("auctions"),
        }
    }

    /// Persist a new auction and return the stored document
    pub async fn insert(&self, auction: &Auction) -> DatabaseResult<Document> {
        let doc = bson::to_document(auction)
            .map_err(|e| DatabaseError::Configuration(format!("Failed to encode auction: {}", e)))?;

        let result = self.collection.insert_one(doc).await?;

        let stored = self
            .collection
            .find_one(doc! { "_id": result.inserted_id.clone() })
            .await?
            .ok_or_else(|| {
                DatabaseError::Configuration("Inserted auction not found on re-read".to_string())
            })?;

        Ok(stored)
    }

    /// Fetch an auction document by identifier
    pub async fn find_by_id(&self, id: ObjectId) -> DatabaseResult<Option<Document>> {
        let auction = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(auction)
    }

    /// Fetch an auction by identifier, decoded into the entity type
    pub async fn find_by_id_typed(&self, id: ObjectId) -> DatabaseResult<Option<Auction>> {
        let auction = self
            .collection
            .clone_with_type::<Auction>()
            .find_one(doc! { "_id": id })
            .await?;
        Ok(auction)
    }

    /// All auctions, natural store order
    pub async fn find_all(&self) -> DatabaseResult<Vec<Document>> {
        let cursor = self.collection.find(doc! {}).await?;
        let auctions = cursor.try_collect().await?;
        Ok(auctions)
    }

    /// Auctions listed by the given seller
    pub async fn find_by_seller(&self, seller_id: ObjectId) -> DatabaseResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(doc! { "seller_id": seller_id })
            .await?;
        let auctions = cursor.try_collect().await?;
        Ok(auctions)
    }

    /// Auctions carrying at least one bid by the given user
    pub async fn find_with_bidder(&self, user_id: ObjectId) -> DatabaseResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(doc! { "bids.user_id": user_id })
            .await?;
        let auctions = cursor.try_collect().await?;
        Ok(auctions)
    }

    /// Atomically append a bid and raise `current_bid`
    ///
    /// Single conditional update: the filter requires the stored
    /// `current_bid` to still be below the bid amount at write time, so two
    /// racing bids cannot both win and a lower bid can never overwrite a
    /// higher one. A non-matching update reports `Outpaced`; the decision to
    /// retry belongs to the caller.
    pub async fn append_bid(&self, auction_id: ObjectId, bid: &Bid) -> DatabaseResult<BidOutcome> {
        let bid_doc = bson::to_bson(bid)
            .map_err(|e| DatabaseError::Configuration(format!("Failed to encode bid: {}", e)))?;

        let result = self
            .collection
            .update_one(
                doc! { "_id": auction_id, "current_bid": { "$lt": bid.amount } },
                doc! {
                    "$push": { "bids": bid_doc },
                    "$set": { "current_bid": bid.amount },
                },
            )
            .await?;

        if result.matched_count == 0 {
            info!(
                "Bid of {} on auction {} lost the conditional update",
                bid.amount, auction_id
            );
            return Ok(BidOutcome::Outpaced);
        }

        Ok(BidOutcome::Accepted)
    }
}
