//! Registration confirmation QR code.
//!
//! The payload is a flat JSON object keyed by field name, so any scanner can
//! parse it. The same text is rendered as terminal blocks for the desk screen
//! and as SVG for saving or printing.

use crate::model::participant::RegistrationPayload;
use qrcode::render::{svg, unicode};
use qrcode::QrCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum QrError {
    Encode(serde_json::Error),
    Render(qrcode::types::QrError),
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode QR payload: {err}"),
            Self::Render(err) => write!(f, "failed to build QR code: {err}"),
        }
    }
}

impl Error for QrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for QrError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(value: qrcode::types::QrError) -> Self {
        Self::Render(value)
    }
}

/// Serializes `payload` as the QR text blob.
pub fn qr_payload(payload: &RegistrationPayload) -> Result<String, serde_json::Error> {
    serde_json::to_string(payload)
}

/// Parses a scanned QR text blob back into its payload.
pub fn parse_qr_payload(text: &str) -> Result<RegistrationPayload, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encodes `payload` into a QR symbol.
pub fn qr_code(payload: &RegistrationPayload) -> Result<QrCode, QrError> {
    let text = qr_payload(payload)?;
    Ok(QrCode::new(text.as_bytes())?)
}

/// Renders the QR symbol as half-block characters, two modules per row.
///
/// Colors are inverted so the code scans on dark terminal backgrounds.
pub fn render_qr_terminal(payload: &RegistrationPayload) -> Result<String, QrError> {
    let code = qr_code(payload)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Renders the QR symbol as a standalone SVG document.
pub fn render_qr_svg(payload: &RegistrationPayload) -> Result<String, QrError> {
    let code = qr_code(payload)?;
    Ok(code
        .render()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RegistrationPayload {
        RegistrationPayload {
            uid: "ONSPOT-1767225600000-0a1b2c3d".to_string(),
            name: "Asha".to_string(),
            email: "asha@gmail.com".to_string(),
            phone: "9876543210".to_string(),
            college: "Mepco, Sivakasi".to_string(),
            dept: "ECE".to_string(),
            year: "B.E".to_string(),
        }
    }

    #[test]
    fn symbol_is_larger_than_version_one() {
        // A JSON blob with six fields does not fit the 21x21 symbol.
        let code = qr_code(&payload()).unwrap();
        assert!(code.width() > 21);
    }

    #[test]
    fn terminal_rendering_is_square_block_art() {
        let rendered = render_qr_terminal(&payload()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines.len() > 10);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(rendered.contains('\u{2580}') || rendered.contains('\u{2584}'));
    }

    #[test]
    fn svg_rendering_is_a_document() {
        let rendered = render_qr_svg(&payload()).unwrap();
        assert!(rendered.contains("<svg"));
        assert!(rendered.contains("#000000"));
    }
}
