//! Application use cases: repository operations and reports.

pub mod analytics;
mod claim;
mod listing;
mod provider;
mod receiver;

pub use analytics::{
    city_counts, claim_status_distribution, listings_by_food_type, listings_by_provider_type,
    meal_type_claims, provider_contacts_by_city, report_overview, top_claimed_foods,
    top_listing_location, top_provider_type_by_quantity, top_providers_by_completed_claims,
    top_providers_by_quantity, total_quantity_available,
};
pub use claim::{claim_create, claim_delete, claim_list, ClaimCreateReq, ClaimDto};
pub use listing::{
    listing_create, listing_delete, listing_get, listing_list, FoodListingCreateReq,
    FoodListingDto,
};
pub use provider::{
    provider_cities, provider_create, provider_delete, provider_get, provider_list,
    ProviderCreateReq, ProviderDto,
};
pub use receiver::{
    receiver_create, receiver_delete, receiver_get, receiver_list, ReceiverCreateReq,
    ReceiverDto,
};
