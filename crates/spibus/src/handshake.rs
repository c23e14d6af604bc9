/// Power-on clocking gate.
///
/// An SD card expects a run of dummy clocks before its first command. Until
/// that many rising edges have been seen, every edge is swallowed here and
/// no framing happens. The gate opens once and never re-arms.
#[derive(Debug, Clone)]
pub(crate) struct Handshake {
    threshold: u32,
    edges: u32,
    initialized: bool,
}

/// What the gate did with a rising edge.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HandshakeEdge {
    /// Gate already open; the edge belongs to the framer.
    Passed,
    /// Edge counted towards the handshake.
    Consumed,
    /// Edge counted and the threshold reached with it.
    Completed,
}

impl Handshake {
    pub(crate) fn new(threshold: u32) -> Self {
        Self {
            threshold,
            edges: 0,
            initialized: false,
        }
    }

    #[inline]
    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub(crate) fn edges(&self) -> u32 {
        self.edges
    }

    pub(crate) fn on_rising_edge(&mut self) -> HandshakeEdge {
        if self.initialized {
            return HandshakeEdge::Passed;
        }

        self.edges = self.edges.saturating_add(1);
        if self.edges >= self.threshold {
            self.initialized = true;
            HandshakeEdge::Completed
        } else {
            HandshakeEdge::Consumed
        }
    }
}
