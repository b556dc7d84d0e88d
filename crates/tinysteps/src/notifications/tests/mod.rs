mod reminders;
mod routing;
mod service;
