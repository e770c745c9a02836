//! 도메인 모델.

pub mod account;
pub mod comment;
pub mod customer;
pub mod deal;
pub mod role;
pub mod status;
pub mod tag;

pub use account::{Account, AccountUpdate, AccountView, NewAccount};
pub use comment::{Comment, CommentInput};
pub use customer::{Customer, CustomerInput};
pub use deal::{Deal, DealInput};
pub use role::Role;
pub use status::{Status, StatusInput};
pub use tag::{Tag, TagInput};
