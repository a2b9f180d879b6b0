pub mod notification;

pub use notification::{
    Notification, NotificationIntent, NotificationResponse, NotificationStatus,
};
