/// One line of the chat reply data stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPart {
    /// `0:` text delta.
    Text(String),
    /// `f:` start of a message frame.
    FrameStart,
    /// `e:` end of a generation step. More steps may follow.
    FinishStep,
    /// `d:` end of the reply.
    Finish,
    Unknown,
}

impl StreamPart {
    /// `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            return None;
        }

        let part = match line.split_once(':') {
            Some(("0", raw)) => Self::Text(decode_text(raw)),
            Some(("f", _)) => Self::FrameStart,
            Some(("e", _)) => Self::FinishStep,
            Some(("d", _)) => Self::Finish,
            _ => Self::Unknown,
        };
        Some(part)
    }
}

// Text parts carry a JSON string literal. Anything that fails to parse is
// passed through with the outer quotes removed.
fn decode_text(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| {
        let raw = raw.strip_prefix('"').unwrap_or(raw);
        let raw = raw.strip_suffix('"').unwrap_or(raw);
        raw.replace("\\n", "\n").replace("\\\"", "\"")
    })
}

/// Reassembles lines that arrive split across network chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Returns every line completed by `chunk`, without the trailing newline.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }
        lines
    }

    /// Whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
