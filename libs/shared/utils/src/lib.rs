pub mod test_utils;
pub mod wall_clock;
