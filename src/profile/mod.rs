//! Company financial profiles and the ingestion boundary that produces them

mod data;
pub mod loader;

pub use data::FinancialProfile;
pub use loader::{load_profile, load_profile_json, load_profiles, load_profiles_from_reader};
