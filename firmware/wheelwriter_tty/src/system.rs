/// Controller Status
/// Microcontroller facts the diagnostic commands can report.

pub trait System {
    /// Value of status port `index` (0-3).
    fn port(&self, index: u8) -> u8;

    /// Resets since power-on, when the controller keeps count.
    fn reset_count(&self) -> Option<u16> {
        None
    }
}
