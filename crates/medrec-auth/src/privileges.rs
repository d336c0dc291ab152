//! Built-in role and privilege names.

/// Role that implicitly holds every privilege.
pub const SUPERUSER_ROLE: &str = "System Developer";

/// Role whose privileges every caller holds, authenticated or not.
pub const ANONYMOUS_ROLE: &str = "Anonymous";

/// Role whose privileges every authenticated caller holds.
pub const AUTHENTICATED_ROLE: &str = "Authenticated";

pub const ADD_ENCOUNTERS: &str = "Add Encounters";
pub const EDIT_ENCOUNTERS: &str = "Edit Encounters";
pub const VIEW_ENCOUNTERS: &str = "View Encounters";

pub const ADD_VISITS: &str = "Add Visits";
pub const EDIT_VISITS: &str = "Edit Visits";
pub const VIEW_VISITS: &str = "View Visits";
pub const VIEW_VISIT_TYPES: &str = "View Visit Types";

pub const ADD_ORDERS: &str = "Add Orders";
pub const EDIT_ORDERS: &str = "Edit Orders";
pub const VIEW_ORDERS: &str = "View Orders";

pub const VIEW_GLOBAL_PROPERTIES: &str = "View Global Properties";
pub const MANAGE_GLOBAL_PROPERTIES: &str = "Manage Global Properties";
