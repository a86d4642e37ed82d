pub mod error;
pub mod todo_client;

pub use error::{ClientError, ClientResult};
pub use todo_client::{TodoApi, TodoClient};
