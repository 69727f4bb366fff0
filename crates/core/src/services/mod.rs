pub mod hit_test_service;
pub mod legend_service;
pub mod movers_service;
pub mod notifications;
pub mod overlay_service;
pub mod range_service;
pub mod series_service;
