//! The built-in application icon and loading of user supplied artwork.

use anyhow::{Context, Result, bail};
use quick_xml::{Reader, events::Event};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The "Pen & Paper Timeline" application icon, drawn on a 1024x1024 canvas.
pub const ICON_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="1024" height="1024" viewBox="0 0 1024 1024" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="bgGradient" cx="40%" cy="30%" r="90%">
      <stop offset="0%" style="stop-color:#667eea;stop-opacity:1" />
      <stop offset="30%" style="stop-color:#764ba2;stop-opacity:1" />
      <stop offset="70%" style="stop-color:#3b2d7b;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#1a1428;stop-opacity:1" />
    </radialGradient>
    <linearGradient id="timelineGradient" x1="0%" y1="0%" x2="100%" y2="0%">
      <stop offset="0%" style="stop-color:#ffd700;stop-opacity:1" />
      <stop offset="25%" style="stop-color:#ff8a65;stop-opacity:1" />
      <stop offset="50%" style="stop-color:#e91e63;stop-opacity:1" />
      <stop offset="75%" style="stop-color:#9c27b0;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#4ecdc4;stop-opacity:1" />
    </linearGradient>
    <linearGradient id="diceGradient" x1="20%" y1="20%" x2="80%" y2="80%">
      <stop offset="0%" style="stop-color:#ffffff;stop-opacity:1" />
      <stop offset="50%" style="stop-color:#f8f9fa;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#e3f2fd;stop-opacity:1" />
    </linearGradient>
    <radialGradient id="clockGradient" cx="30%" cy="30%" r="70%">
      <stop offset="0%" style="stop-color:#ffffff;stop-opacity:0.95" />
      <stop offset="50%" style="stop-color:#f5f5f5;stop-opacity:0.85" />
      <stop offset="100%" style="stop-color:#e8eaf6;stop-opacity:0.75" />
    </radialGradient>
    <linearGradient id="scrollGradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#fff8e1;stop-opacity:1" />
      <stop offset="50%" style="stop-color:#f4f1e8;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#efebe0;stop-opacity:1" />
    </linearGradient>
    <filter id="shadow" x="-50%" y="-50%" width="200%" height="200%">
      <feDropShadow dx="6" dy="12" stdDeviation="16" flood-color="rgba(0,0,0,0.4)"/>
    </filter>
    <filter id="glow" x="-50%" y="-50%" width="200%" height="200%">
      <feGaussianBlur stdDeviation="6" result="coloredBlur"/>
      <feMerge>
        <feMergeNode in="coloredBlur"/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>
    <filter id="innerShadow" x="-50%" y="-50%" width="200%" height="200%">
      <feGaussianBlur in="SourceAlpha" stdDeviation="3"/>
      <feOffset dx="2" dy="2" result="offset"/>
      <feComposite in="SourceGraphic" in2="offset" operator="over"/>
    </filter>
  </defs>
  <rect width="1024" height="1024" rx="220" ry="220" fill="url(#bgGradient)"/>
  <rect width="1024" height="1024" rx="220" ry="220" fill="none" stroke="rgba(255,255,255,0.15)" stroke-width="3"/>
  <rect x="120" y="460" width="784" height="32" rx="16" ry="16" fill="url(#timelineGradient)" filter="url(#shadow)"/>
  <rect x="124" y="464" width="776" height="24" rx="12" ry="12" fill="rgba(255,255,255,0.2)"/>
  <circle cx="200" cy="476" r="20" fill="#ffd700" stroke="rgba(255,255,255,0.3)" stroke-width="2" filter="url(#glow)"/>
  <circle cx="340" cy="476" r="18" fill="#ff8a65" stroke="rgba(255,255,255,0.3)" stroke-width="2" filter="url(#glow)"/>
  <circle cx="512" cy="476" r="24" fill="#e91e63" stroke="rgba(255,255,255,0.4)" stroke-width="3" filter="url(#glow)"/>
  <circle cx="684" cy="476" r="18" fill="#9c27b0" stroke="rgba(255,255,255,0.3)" stroke-width="2" filter="url(#glow)"/>
  <circle cx="824" cy="476" r="20" fill="#4ecdc4" stroke="rgba(255,255,255,0.3)" stroke-width="2" filter="url(#glow)"/>
  <g transform="translate(200,180)" filter="url(#shadow)">
    <path d="M 0,-60 L 57,-18 L 35,48 L -35,48 L -57,-18 Z" fill="url(#diceGradient)" stroke="#4a5568" stroke-width="3"/>
    <path d="M 0,-60 L 57,-18 L 0,12 Z" fill="rgba(255,255,255,0.9)" stroke="#4a5568" stroke-width="2"/>
    <path d="M 0,-60 L -57,-18 L 0,12 Z" fill="rgba(255,255,255,0.7)" stroke="#4a5568" stroke-width="2"/>
    <text x="0" y="-5" text-anchor="middle" font-family="system-ui, -apple-system, sans-serif" font-size="32" font-weight="bold" fill="#2d3748">20</text>
    <circle cx="15" cy="-35" r="3" fill="#4a5568"/>
    <circle cx="-15" cy="-35" r="3" fill="#4a5568"/>
  </g>
  <g transform="translate(780,180)" filter="url(#shadow)">
    <circle cx="0" cy="0" r="90" fill="url(#clockGradient)" stroke="#4a5568" stroke-width="4"/>
    <circle cx="0" cy="0" r="8" fill="#2d3748"/>
    <line x1="0" y1="0" x2="0" y2="-50" stroke="#2d3748" stroke-width="6" stroke-linecap="round"/>
    <line x1="0" y1="0" x2="40" y2="0" stroke="#2d3748" stroke-width="8" stroke-linecap="round"/>
    <circle cx="0" cy="-70" r="5" fill="#4a5568"/>
    <circle cx="70" cy="0" r="5" fill="#4a5568"/>
    <circle cx="0" cy="70" r="5" fill="#4a5568"/>
    <circle cx="-70" cy="0" r="5" fill="#4a5568"/>
    <circle cx="49" cy="-49" r="3" fill="#718096"/>
    <circle cx="49" cy="49" r="3" fill="#718096"/>
    <circle cx="-49" cy="49" r="3" fill="#718096"/>
    <circle cx="-49" cy="-49" r="3" fill="#718096"/>
  </g>
  <g transform="translate(512,700)" filter="url(#shadow)">
    <ellipse cx="0" cy="0" rx="220" ry="130" fill="url(#scrollGradient)" stroke="#d4af37" stroke-width="5"/>
    <ellipse cx="0" cy="0" rx="200" ry="110" fill="none" stroke="#d4af37" stroke-width="2" opacity="0.7"/>
    <g transform="translate(60,-25) rotate(30)">
      <rect x="0" y="0" width="90" height="8" rx="4" fill="#8b4513"/>
      <polygon points="90,4 115,0 115,8" fill="#2d3748"/>
      <ellipse cx="8" cy="4" rx="10" ry="16" fill="#e91e63" opacity="0.8"/>
    </g>
    <line x1="-140" y1="-50" x2="70" y2="-50" stroke="#8b4513" stroke-width="3" opacity="0.7"/>
    <line x1="-140" y1="-20" x2="50" y2="-20" stroke="#8b4513" stroke-width="3" opacity="0.7"/>
    <line x1="-140" y1="10" x2="90" y2="10" stroke="#8b4513" stroke-width="3" opacity="0.7"/>
    <line x1="-140" y1="40" x2="30" y2="40" stroke="#8b4513" stroke-width="3" opacity="0.7"/>
    <line x1="-140" y1="70" x2="110" y2="70" stroke="#8b4513" stroke-width="3" opacity="0.7"/>
  </g>
  <g transform="translate(120,360)" filter="url(#shadow)">
    <rect x="0" y="20" width="100" height="100" rx="12" fill="#ffffff" stroke="#4a5568" stroke-width="3"/>
    <rect x="0" y="20" width="100" height="25" rx="12" fill="#4ecdc4"/>
    <rect x="20" y="8" width="6" height="25" rx="3" fill="#4a5568"/>
    <rect x="74" y="8" width="6" height="25" rx="3" fill="#4a5568"/>
    <line x1="15" y1="55" x2="85" y2="55" stroke="#e2e8f0" stroke-width="2"/>
    <line x1="15" y1="75" x2="85" y2="75" stroke="#e2e8f0" stroke-width="2"/>
    <line x1="15" y1="95" x2="85" y2="95" stroke="#e2e8f0" stroke-width="2"/>
    <line x1="30" y1="45" x2="30" y2="110" stroke="#e2e8f0" stroke-width="2"/>
    <line x1="50" y1="45" x2="50" y2="110" stroke="#e2e8f0" stroke-width="2"/>
    <line x1="70" y1="45" x2="70" y2="110" stroke="#e2e8f0" stroke-width="2"/>
    <text x="50" y="88" text-anchor="middle" font-family="system-ui, -apple-system, sans-serif" font-size="20" font-weight="bold" fill="#2d3748">16</text>
  </g>
  <g opacity="0.9">
    <g transform="translate(320,140)">
      <polygon points="0,-20 5,-5 20,0 5,5 0,20 -5,5 -20,0 -5,-5" fill="#ffd700" filter="url(#glow)"/>
      <polygon points="0,-12 3,-3 12,0 3,3 0,12 -3,3 -12,0 -3,-3" fill="#fff" opacity="0.8"/>
    </g>
    <g transform="translate(800,420)">
      <polygon points="0,-12 3,-3 12,0 3,3 0,12 -3,3 -12,0 -3,-3" fill="#e91e63" filter="url(#glow)"/>
    </g>
    <g transform="translate(880,650)">
      <polygon points="0,-10 2.5,-2.5 10,0 2.5,2.5 0,10 -2.5,2.5 -10,0 -2.5,-2.5" fill="#4ecdc4" filter="url(#glow)"/>
    </g>
    <circle cx="150" cy="600" r="4" fill="#ffd700" opacity="0.8"/>
    <circle cx="900" cy="250" r="3" fill="#9c27b0" opacity="0.7"/>
    <circle cx="250" cy="800" r="5" fill="#ff8a65" opacity="0.8"/>
  </g>
  <path d="M 290 240 Q 400 320 480 460" stroke="rgba(255,255,255,0.2)" stroke-width="3" fill="none" stroke-dasharray="8,6" opacity="0.6"/>
  <path d="M 710 240 Q 620 320 544 460" stroke="rgba(255,255,255,0.2)" stroke-width="3" fill="none" stroke-dasharray="8,6" opacity="0.6"/>
  <path d="M 200 450 Q 350 550 450 680" stroke="rgba(255,255,255,0.15)" stroke-width="2" fill="none" stroke-dasharray="6,4" opacity="0.5"/>
</svg>"##;

/// Where the vector artwork for a run comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IconSource {
    /// The artwork compiled into the binary ([`ICON_SVG`])
    #[default]
    Builtin,

    /// An SVG document on disk
    File(PathBuf),
}

impl IconSource {
    /// Read the SVG text and make sure it's actually an SVG document.
    pub fn load(&self) -> Result<String> {
        let text = match self {
            IconSource::Builtin => ICON_SVG.to_string(),
            IconSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read SVG from {}", path.display()))?,
        };

        let info = SvgInfo::parse(&text)?;
        debug!(source = %self, info = ?info, "Loaded SVG");
        Ok(text)
    }

    /// Write the SVG text to the given path.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.load()?)
            .with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        Ok(())
    }
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconSource::Builtin => write!(f, "builtin"),
            IconSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Attributes of the root `<svg>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SvgInfo {
    pub width: Option<String>,
    pub height: Option<String>,
    pub view_box: Option<String>,
}

impl SvgInfo {
    /// Parse the root element of an SVG document. Anything other than an
    /// `<svg>` root is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event()? {
                Event::Start(element) | Event::Empty(element) => {
                    if element.local_name().as_ref() != b"svg" {
                        bail!(
                            "Expected an <svg> root element, found <{}>",
                            String::from_utf8_lossy(element.name().as_ref())
                        );
                    }

                    let mut info = SvgInfo::default();
                    for attr in element.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?.to_string();
                        match attr.key.as_ref() {
                            b"width" => info.width = Some(value),
                            b"height" => info.height = Some(value),
                            b"viewBox" => info.view_box = Some(value),
                            _ => {}
                        }
                    }
                    return Ok(info);
                }
                Event::Eof => bail!("Document does not contain an <svg> element"),
                _ => continue,
            }
        }
    }
}
