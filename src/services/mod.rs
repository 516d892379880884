pub mod articles;
pub mod users;

pub use articles::ArticleService;
pub use users::UserService;
