mod codeword;
mod country;

pub use codeword::{FREE_FORMAT_CODEWORD, is_valid_codeword};
pub use country::{ISO_COUNTRY_CODES, normalize_country};
