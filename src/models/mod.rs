pub mod client;
pub mod membership;
pub mod todo;
pub mod user;

pub use client::{ApplicationType, Client, ClientFinder, ClientId, ClientRegistration};
pub use membership::{EmailError, EmailSender, IdentityResult, MembershipError, UserManager};
pub use todo::{Todo, TodoAction, TodoFinder, TodoId, TodoResult, TodoState};
pub use user::{User, UserId, UserInfoResult, UserResult};
