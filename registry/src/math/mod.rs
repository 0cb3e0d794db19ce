pub mod arithmetic;
pub mod operation;
pub mod validator;
