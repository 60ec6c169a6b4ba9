/// Outcome of offering a key event to a component.
///
/// Parent views match on this to decide whether to stop, surface the
/// component's event, or fall through to their own bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, no event for parent to handle
  Handled,
  /// Key was consumed, here's an event for parent to process
  Event(T),
  /// Key was not consumed, parent should try next handler
  NotHandled,
}
