//! 数据传输对象
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    CODE_FORMAT_MESSAGE, CreateSubjectRequest, SHORT_TAG_FORMAT_MESSAGE, SignInRequest,
    SignUpRequest, UpdateSubjectRequest,
};
pub use response::{AuthResponse, MessageResponse, SessionResponse, SignOutResponse};
