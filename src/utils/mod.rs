mod money_utils;
mod time_utils;

pub use money_utils::{COPPER_PER_GOLD, copper_to_gold, copper_to_gold_f64, format_gold};
pub use time_utils::{
    TimeUtils, epoch_sec_to_local, format_duration, naive_utc_to_local, time_ago,
};
