pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;
pub use setup::with_test_database;

pub mod prelude {
    pub use crate::{
        fixtures::{test_db, test_user, user::factory},
        with_test_database, TestBuilder, TestContext, TestError,
    };
}
