//! External collaborator clients.

pub mod venue;

pub use venue::{
    AdvancedSettings, CandleQuery, MarketFeed, PurchaseRequest, VenueClient, VenueError,
};
