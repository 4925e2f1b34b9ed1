/// Notified after a publish that changed the module-set id
///
/// Called outside the writer lock, in registration order. Calls for
/// successive publications never overlap and arrive in publication order,
/// so each `previous_id` is the `current_id` of the call before it.
pub trait ModuleSetListener: Send + Sync {
    fn module_set_changed(&self, previous_id: &str, current_id: &str);
}
