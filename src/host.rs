//! Host-provided facilities
//!
//! The editor host owns the clipboard, notifications, and link opening; the
//! widget only ever talks to them through these traits, injected at
//! construction. All three are fire-and-forget: failures are cosmetic and
//! implementations swallow them.

/// System clipboard access.
pub trait Clipboard {
    fn write(&self, text: &str);
}

/// Transient notification display.
pub trait Notifier {
    fn show(&self, message: &str, duration_ms: u32);
}

/// Opens a URL in the host's browser facility.
pub trait LinkOpener {
    fn open(&self, url: &str);
}

/// The bundle of host facilities handed to the widget at construction.
pub struct HostFacilities {
    pub clipboard: Box<dyn Clipboard>,
    pub notifier: Box<dyn Notifier>,
    pub opener: Box<dyn LinkOpener>,
}
