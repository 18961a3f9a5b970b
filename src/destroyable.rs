/// Implemented by long-lived objects that hold subscriptions or pending timers
/// pointing back at themselves; `destroy` breaks those cycles explicitly.
pub trait Destroyable {
    fn destroy(&mut self);
}
