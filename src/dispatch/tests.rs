mod scenario;
pub(crate) mod utils;
