pub mod http_message_types;
pub mod middleware_stack;
