pub mod config_ops;
pub mod table_ops;
pub mod translit_ops;

/// Unwrap a command's `Result`, or report `u2atool: <context>: <error>` on
/// stderr and exit with status 1.
macro_rules! die {
    ($result:expr, $($context:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                eprintln!("u2atool: {}: {}", format_args!($($context)+), err);
                std::process::exit(1)
            }
        }
    };
}
pub(crate) use die;
