//! Navigation seam for the floating cart control.

/// Screen opened by the floating cart control.
pub const CART_SCREEN: &str = "Cart";

/// Requests navigation to a named screen.
///
/// The cart never inspects the result; routing belongs to the host app.
pub trait Navigator {
    fn navigate_to(&self, screen: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn navigate_to(&self, screen: &str) {
        self(screen);
    }
}
