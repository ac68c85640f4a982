//! Notifications raised by the dispatcher.

use restyle_protocols::Notification;

pub const INJECT_ERROR_ID: &str = "inject-error";
pub const SITE_ERROR_ID: &str = "zhihu-error";

const INJECT_ERROR_TITLE: &str = "Injecting content script error";
const INJECT_ERROR_MESSAGE: &str = "You cannot inject script here!";
const SITE_ERROR_TITLE: &str = "修改知乎样式错误";
const NOT_ON_SITE_MESSAGE: &str = "请在知乎页面使用此功能！";
const CANNOT_RUN_MESSAGE: &str = "无法在此页面执行此操作！";

/// Script injection is not possible on this tab.
pub fn inject_error(icon_url: Option<&str>) -> Notification {
    with_icon(Notification::new(INJECT_ERROR_TITLE, INJECT_ERROR_MESSAGE), icon_url)
}

/// The site routine was requested away from the site.
pub fn not_on_site(icon_url: Option<&str>) -> Notification {
    with_icon(Notification::new(SITE_ERROR_TITLE, NOT_ON_SITE_MESSAGE), icon_url)
}

/// The host refused to run the site routine.
pub fn cannot_run_here(icon_url: Option<&str>) -> Notification {
    with_icon(Notification::new(SITE_ERROR_TITLE, CANNOT_RUN_MESSAGE), icon_url)
}

fn with_icon(notification: Notification, icon_url: Option<&str>) -> Notification {
    match icon_url {
        Some(icon) => notification.with_icon(icon),
        None => notification,
    }
}
