pub use super::document::Entity as Document;
