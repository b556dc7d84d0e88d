mod common;
mod moderation;
mod routing;
