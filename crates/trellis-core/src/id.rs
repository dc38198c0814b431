//! Arena keys for widgets.

use slotmap::new_key_type;

new_key_type! {
    /// Identifies a widget attached to an application.
    ///
    /// Keys are generational: once a widget is deleted its ID never resolves
    /// again, even if the slot is reused.
    pub struct WidgetId;
}
