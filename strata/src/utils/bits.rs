macro_rules! bit {
    ($bit_num:expr) => {
        1 << $bit_num
    };
}

pub(crate) use bit;
