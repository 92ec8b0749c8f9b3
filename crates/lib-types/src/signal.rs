//! Signal family catalog.
//!
//! Every family is a closed-form waveform centered at index 0. The catalog
//! is fixed: generators dispatch with an exhaustive `match`, so adding a
//! variant here turns every missing arm into a compile error instead of a
//! silent zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical teaching waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalFamily {
    /// Unit pulse on |n| <= 3.
    Rectangular,

    /// Linear ramp 1 - |n|/5 on |n| <= 5.
    Triangular,

    /// exp(-n^2 / 10), no cutoff.
    Gaussian,

    /// Two width-3 pulses centered at -4 and +4.
    DoublePulse,

    /// cos(n*pi/4) windowed to |n| <= 8.
    SinePulse,

    /// Period 8, width 3, repeating forever in both directions.
    PulseTrain,
}

impl SignalFamily {
    /// All families in display order.
    pub const ALL: [SignalFamily; 6] = [
        SignalFamily::Rectangular,
        SignalFamily::Triangular,
        SignalFamily::Gaussian,
        SignalFamily::DoublePulse,
        SignalFamily::SinePulse,
        SignalFamily::PulseTrain,
    ];

    /// Stable identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalFamily::Rectangular => "RECTANGULAR",
            SignalFamily::Triangular => "TRIANGULAR",
            SignalFamily::Gaussian => "GAUSSIAN",
            SignalFamily::DoublePulse => "DOUBLE_PULSE",
            SignalFamily::SinePulse => "SINE_PULSE",
            SignalFamily::PulseTrain => "PULSE_TRAIN",
        }
    }

    /// Short human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            SignalFamily::Rectangular => "Rectangular pulse",
            SignalFamily::Triangular => "Triangular pulse",
            SignalFamily::Gaussian => "Gaussian pulse",
            SignalFamily::DoublePulse => "Double-pulse echo",
            SignalFamily::SinePulse => "Short sine burst",
            SignalFamily::PulseTrain => "Periodic pulse train",
        }
    }

    /// Whether the family is zero outside a bounded index range.
    pub fn has_finite_support(&self) -> bool {
        !matches!(self, SignalFamily::Gaussian | SignalFamily::PulseTrain)
    }

    /// Application context shown next to the plots.
    pub fn case_study(&self) -> CaseStudy {
        match self {
            SignalFamily::Rectangular => CaseStudy {
                title: "Digital pulses and optimal reception",
                subtitle: "Digital Pulse & Matched Filter",
                concept: "Matched filter",
                explanation: "To maximize detection probability in noise, a digital receiver \
                    uses a filter matched to the transmitted pulse shape. The autocorrelation \
                    of a rectangular pulse is a triangle; its peak marks the optimal sampling \
                    instant, where the SNR is highest.",
                application: "Baseband transmission",
            },
            SignalFamily::Triangular => CaseStudy {
                title: "Smoothing and spline interpolation",
                subtitle: "Smoothing & Spline Interpolation",
                concept: "Smoothing effect",
                explanation: "Autocorrelation is an integrating operation with a low-pass \
                    character. A rectangle correlates into a triangle, and a triangle into an \
                    even smoother spline-like curve. This is why correlation suppresses \
                    high-frequency random noise.",
                application: "Image denoising",
            },
            SignalFamily::Gaussian => CaseStudy {
                title: "Gaussian wave packets in optical links",
                subtitle: "Gaussian Wave Packet",
                concept: "Shape invariance",
                explanation: "The autocorrelation of a Gaussian is again a Gaussian. It has the \
                    minimum time-bandwidth product allowed by the uncertainty principle and \
                    keeps its basic shape through linear systems, which suits long-haul fiber.",
                application: "Optical fiber communication",
            },
            SignalFamily::DoublePulse => CaseStudy {
                title: "Radar echo ranging",
                subtitle: "Radar & Sonar Ranging",
                concept: "Time of flight",
                explanation: "A radar transmits a double pulse or coded burst and correlates the \
                    return. The position of the side peak in R(m) is the echo delay of the \
                    target, and correlation pulls weak echoes out of background noise.",
                application: "Radar and sonar",
            },
            SignalFamily::SinePulse => CaseStudy {
                title: "Speech pitch detection",
                subtitle: "Pitch Detection Algorithm",
                concept: "Short-time autocorrelation",
                explanation: "The second prominent peak of R(m) sits at the fundamental period \
                    T0. Speech coders use it to extract the speaker's pitch: even when the \
                    waveform is complex, periodicity stays visible in the correlation domain.",
                application: "Speech coding (e.g. GSM)",
            },
            SignalFamily::PulseTrain => CaseStudy {
                title: "Clock synchronization and recovery",
                subtitle: "Clock Synchronization",
                concept: "Periodicity estimation",
                explanation: "The autocorrelation of a periodic pulse train is itself periodic, \
                    with peaks exactly at integer multiples of the period T. A receiver locks \
                    onto the transmitter clock frequency with it to recover data timing.",
                application: "Clock and data recovery (CDR)",
            },
        }
    }
}

impl Default for SignalFamily {
    fn default() -> Self {
        SignalFamily::Rectangular
    }
}

impl fmt::Display for SignalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a family name is not in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Unknown signal family '{0}'. Expected one of: rectangular, triangular, gaussian, double-pulse, sine-pulse, pulse-train")]
pub struct ParseFamilyError(pub String);

impl FromStr for SignalFamily {
    type Err = ParseFamilyError;

    /// Accepts `DOUBLE_PULSE`, `double_pulse`, `double-pulse` and `DoublePulse`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "rectangular" | "rect" => Ok(SignalFamily::Rectangular),
            "triangular" | "tri" => Ok(SignalFamily::Triangular),
            "gaussian" => Ok(SignalFamily::Gaussian),
            "doublepulse" => Ok(SignalFamily::DoublePulse),
            "sinepulse" => Ok(SignalFamily::SinePulse),
            "pulsetrain" => Ok(SignalFamily::PulseTrain),
            _ => Err(ParseFamilyError(s.to_string())),
        }
    }
}

/// Teaching context attached to a signal family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CaseStudy {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub concept: &'static str,
    pub explanation: &'static str,
    pub application: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("DOUBLE_PULSE".parse::<SignalFamily>().unwrap(), SignalFamily::DoublePulse);
        assert_eq!("double-pulse".parse::<SignalFamily>().unwrap(), SignalFamily::DoublePulse);
        assert_eq!("PulseTrain".parse::<SignalFamily>().unwrap(), SignalFamily::PulseTrain);
        assert_eq!(" gaussian ".parse::<SignalFamily>().unwrap(), SignalFamily::Gaussian);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "chirp".parse::<SignalFamily>().unwrap_err();
        assert_eq!(err, ParseFamilyError("chirp".to_string()));
        assert!(err.to_string().contains("chirp"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for family in SignalFamily::ALL {
            assert_eq!(family.to_string().parse::<SignalFamily>().unwrap(), family);
        }
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&SignalFamily::SinePulse).unwrap();
        assert_eq!(json, "\"SINE_PULSE\"");

        let back: SignalFamily = serde_json::from_str("\"PULSE_TRAIN\"").unwrap();
        assert_eq!(back, SignalFamily::PulseTrain);
    }

    #[test]
    fn test_finite_support_classification() {
        assert!(SignalFamily::Rectangular.has_finite_support());
        assert!(SignalFamily::SinePulse.has_finite_support());
        assert!(!SignalFamily::Gaussian.has_finite_support());
        assert!(!SignalFamily::PulseTrain.has_finite_support());
    }

    #[test]
    fn test_every_family_has_case_study() {
        for family in SignalFamily::ALL {
            let info = family.case_study();
            assert!(!info.title.is_empty());
            assert!(!info.explanation.is_empty());
        }
    }
}
