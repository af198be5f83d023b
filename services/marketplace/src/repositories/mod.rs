//! Repositories for document-store access

pub mod auction;
pub mod user;

pub use auction::{AuctionRepository, BidOutcome};
pub use user::UserRepository;
