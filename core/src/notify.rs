/// One-way user notification (a modal alert in the original host).
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Logs notices instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        tracing::info!(notice = message, "user notice");
    }
}

impl<F> Notifier for F
where
    F: Fn(&str),
{
    fn alert(&self, message: &str) {
        self(message)
    }
}
