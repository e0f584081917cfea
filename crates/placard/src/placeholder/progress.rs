use crate::{ILLEGAL_ARGUMENT, ILLEGAL_NUMBER_FORMAT};

/// A bar of repeated symbols: `args = [value, max, length?]`.
///
/// Colors are legacy `&` codes, translated like any other literal text once
/// the result is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBarPlaceholder {
    pub symbol: String,
    pub completed_color: String,
    pub progress_color: String,
    pub remaining_color: String,
    pub length: usize,
}

impl Default for ProgressBarPlaceholder {
    fn default() -> Self {
        Self {
            symbol: "|".to_string(),
            completed_color: "&a".to_string(),
            progress_color: "&e".to_string(),
            remaining_color: "&7".to_string(),
            length: 20,
        }
    }
}

impl ProgressBarPlaceholder {
    /// Longest bar a template may ask for.
    pub const MAX_LENGTH: usize = 1024;

    /// Renders the bar for `value` out of `max`, at most [`Self::MAX_LENGTH`]
    /// symbols long.
    pub fn render(&self, value: f64, max: f64, length: usize) -> String {
        let length = length.min(Self::MAX_LENGTH);
        let ratio = (value / max).clamp(0.0, 1.0);
        let completed = ((ratio * length as f64).floor() as usize).min(length);

        let mut out = String::new();
        out.push_str(&self.completed_color);
        out.push_str(&self.symbol.repeat(completed));
        if completed < length {
            out.push_str(&self.progress_color);
            out.push_str(&self.symbol);
            out.push_str(&self.remaining_color);
            out.push_str(&self.symbol.repeat(length - completed - 1));
        }
        out
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        let (Some(value), Some(max)) = (args.first(), args.get(1)) else {
            return ILLEGAL_ARGUMENT.to_string();
        };
        let length = match args.get(2) {
            Some(length) => match length.trim().parse::<usize>() {
                Ok(length) if length <= Self::MAX_LENGTH => length,
                _ => return ILLEGAL_NUMBER_FORMAT.to_string(),
            },
            None => self.length,
        };
        match (value.trim().parse::<f64>(), max.trim().parse::<f64>()) {
            (Ok(value), Ok(max)) if max > 0.0 && value.is_finite() => {
                self.render(value, max, length)
            }
            _ => ILLEGAL_NUMBER_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::args;
    use super::*;

    fn bar() -> ProgressBarPlaceholder {
        ProgressBarPlaceholder {
            symbol: "#".to_string(),
            length: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_render() {
        let p = bar();
        assert_eq!(p.resolve(&args(&["0", "10"])), "&a&e#&7###");
        assert_eq!(p.resolve(&args(&["5", "10"])), "&a##&e#&7#");
        assert_eq!(p.resolve(&args(&["10", "10"])), "&a####");
        assert_eq!(p.resolve(&args(&["50", "10"])), "&a####");
        assert_eq!(p.resolve(&args(&["-5", "10"])), "&a&e#&7###");
    }

    #[test]
    fn test_length_argument() {
        assert_eq!(bar().resolve(&args(&["1", "2", "2"])), "&a#&e#&7");
    }

    #[test]
    fn test_bad_arguments() {
        let p = bar();
        assert_eq!(p.resolve(&args(&["5"])), ILLEGAL_ARGUMENT);
        assert_eq!(p.resolve(&args(&["x", "10"])), ILLEGAL_NUMBER_FORMAT);
        assert_eq!(p.resolve(&args(&["1", "0"])), ILLEGAL_NUMBER_FORMAT);
        assert_eq!(p.resolve(&args(&["1", "2", "long"])), ILLEGAL_NUMBER_FORMAT);
    }

    #[test]
    fn test_length_is_bounded() {
        let p = bar();
        assert_eq!(p.resolve(&args(&["1", "2", "1025"])), ILLEGAL_NUMBER_FORMAT);
        assert_eq!(
            p.resolve(&args(&["1", "2", "18446744073709551615"])),
            ILLEGAL_NUMBER_FORMAT
        );
        let longest = p.resolve(&args(&["2", "2", "1024"]));
        assert_eq!(longest.matches('#').count(), 1024);

        let configured = ProgressBarPlaceholder {
            length: usize::MAX,
            ..bar()
        };
        assert_eq!(configured.resolve(&args(&["2", "2"])).matches('#').count(), 1024);
    }
}
