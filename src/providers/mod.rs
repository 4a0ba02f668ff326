pub mod currency_beacon;
pub mod frankfurter;
pub mod symbols;
pub mod util;
