//! Wire types shared between the curve editor and the server
//!
//! A curve travels as two fields:
//!
//! - `cmd_state`: exactly [`CMD_STATE_LEN`] integers in 0-100, non-decreasing,
//!   the last one always [`CMD_STATE_TERMINAL`].
//! - `auxiliary_curve`: the interior control points as percentages,
//!   `"x,y;x,y;..."`. Boundary points never appear in it.
//!
//! The shape of both fields is fixed by the server and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global request ID counter for correlation
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Maximum encoded message size (8KB)
pub const MAX_MESSAGE_SIZE: usize = 8 * 1024;

/// Number of entries in `cmd_state`
pub const CMD_STATE_LEN: usize = 10;

/// Value the last `cmd_state` entry always carries
pub const CMD_STATE_TERMINAL: u8 = 100;

/// Largest percentage on either axis
pub const PERCENT_MAX: u8 = 100;

/// Separator between points in the percentage string
pub const POINT_SEPARATOR: char = ';';

/// Separator between the x and y percentage of one point
pub const COORD_SEPARATOR: char = ',';

/// Upper bound on interior points accepted from the wire
const MAX_AUXILIARY_POINTS: usize = 64;

/// Generate a unique request ID for correlation
pub fn generate_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// One control point in protocol space: x grows rightwards, y grows upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: u8,
    pub y: u8,
}

impl PercentPoint {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PercentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.x, COORD_SEPARATOR, self.y)
    }
}

/// Why a single `"x,y"` pair of a percentage string failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairError {
    /// 0-based position of the pair in the string
    pub pair: usize,
    /// The offending text
    pub text: String,
    pub reason: String,
}

impl fmt::Display for PairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair {} ({:?}): {}", self.pair, self.text, self.reason)
    }
}

impl std::error::Error for PairError {}

/// Parse a percentage string into points, in order
///
/// An empty (or all-whitespace) string is a curve with no interior points.
pub fn parse_auxiliary_curve(s: &str) -> Result<Vec<PercentPoint>, PairError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut points = Vec::new();
    for (pair, text) in trimmed.split(POINT_SEPARATOR).enumerate() {
        let fail = |reason: &str| PairError {
            pair,
            text: text.to_string(),
            reason: reason.to_string(),
        };

        if pair >= MAX_AUXILIARY_POINTS {
            return Err(fail("too many points"));
        }

        let (x, y) = text
            .split_once(COORD_SEPARATOR)
            .ok_or_else(|| fail("missing ',' between x and y"))?;

        let x = parse_percent(x).map_err(|reason| fail(&format!("x {}", reason)))?;
        let y = parse_percent(y).map_err(|reason| fail(&format!("y {}", reason)))?;
        points.push(PercentPoint { x, y });
    }

    Ok(points)
}

fn parse_percent(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("is empty".into());
    }
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("is not an integer: {:?}", raw))?;
    if value > PERCENT_MAX as u32 {
        return Err(format!("out of range: {} (must be 0-{})", value, PERCENT_MAX));
    }
    Ok(value as u8)
}

/// Format points as a percentage string (`"x,y;x,y"`)
pub fn format_auxiliary_curve(points: &[PercentPoint]) -> String {
    points
        .iter()
        .map(PercentPoint::to_string)
        .collect::<Vec<_>>()
        .join(&POINT_SEPARATOR.to_string())
}

/// The serialized curve sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePayload {
    pub cmd_state: Vec<u8>,
    pub auxiliary_curve: String,
}

impl CurvePayload {
    pub fn new(cmd_state: [u8; CMD_STATE_LEN], auxiliary_curve: String) -> Self {
        Self {
            cmd_state: cmd_state.to_vec(),
            auxiliary_curve,
        }
    }

    /// Validate the payload shape before it goes on the wire
    pub fn validate(&self) -> Result<(), String> {
        validate_cmd_state(&self.cmd_state)?;
        parse_auxiliary_curve(&self.auxiliary_curve).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Interior control points carried by `auxiliary_curve`
    pub fn control_points(&self) -> Result<Vec<PercentPoint>, PairError> {
        parse_auxiliary_curve(&self.auxiliary_curve)
    }
}

/// Validate that `cmd_state` has the fixed server shape
pub fn validate_cmd_state(cmd_state: &[u8]) -> Result<(), String> {
    if cmd_state.len() != CMD_STATE_LEN {
        return Err(format!(
            "cmd_state must have {} entries, got {}",
            CMD_STATE_LEN,
            cmd_state.len()
        ));
    }
    if let Some(v) = cmd_state.iter().find(|v| **v > PERCENT_MAX) {
        return Err(format!("cmd_state value {} out of range (0-{})", v, PERCENT_MAX));
    }
    if cmd_state.windows(2).any(|w| w[1] < w[0]) {
        return Err("cmd_state must be non-decreasing".into());
    }
    if cmd_state.last() != Some(&CMD_STATE_TERMINAL) {
        return Err(format!("cmd_state must end with {}", CMD_STATE_TERMINAL));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation and debugging
    pub id: u64,
    /// The actual request
    #[serde(flatten)]
    pub request: Request,
}

impl RequestEnvelope {
    pub fn new(request: Request) -> Self {
        Self {
            id: generate_request_id(),
            request,
        }
    }

    pub fn with_id(request: Request, id: u64) -> Self {
        Self { id, request }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum Request {
    Ping,
    /// Fetch the curve currently stored on the server
    GetCurve,
    /// Replace the curve stored on the server
    SetCurve(CurvePayload),
}

impl Request {
    /// Validate request parameters before sending
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Request::Ping | Request::GetCurve => Ok(()),
            Request::SetCurve(payload) => payload.validate(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Request::Ping => "Ping",
            Request::GetCurve => "GetCurve",
            Request::SetCurve(_) => "SetCurve",
        }
    }
}

/// Encode a request as a single JSON line, enforcing validation and size
pub fn encode_request(envelope: &RequestEnvelope) -> Result<String, String> {
    envelope.request.validate()?;
    let json = serde_json::to_string(envelope).map_err(|e| e.to_string())?;
    if json.len() > MAX_MESSAGE_SIZE {
        return Err(format!(
            "message too large: {} bytes (max {} bytes)",
            json.len(),
            MAX_MESSAGE_SIZE
        ));
    }
    Ok(json)
}

/// Decode a request, enforcing size and validation
pub fn decode_request(raw: &str) -> Result<RequestEnvelope, String> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(format!(
            "message too large: {} bytes (max {} bytes)",
            raw.len(),
            MAX_MESSAGE_SIZE
        ));
    }
    let envelope: RequestEnvelope = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    envelope.request.validate()?;
    Ok(envelope)
}
