pub mod payment_method;
pub mod student;

pub use payment_method::{find_channel, PaymentChannel, PAYMENT_CHANNELS};
pub use student::StudentContext;
