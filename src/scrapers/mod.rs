pub mod client;
pub mod error;
pub mod realtor;
pub mod traits;
pub mod types;


pub use realtor::RealtorScraper;
pub use traits::ScraperTrait;
