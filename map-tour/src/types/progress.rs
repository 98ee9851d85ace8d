/// Segmented progress bar state: the tour percentage rounded down to a
/// whole block, and how many blocks are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressIndicator {
    pub percentage: u32,
    pub filled_blocks: usize,
}

impl ProgressIndicator {
    /// `percentage` is on a 0-100 scale; `increment` is the size of one
    /// block in percent. Filled blocks never exceed `block_count`.
    pub fn from_percentage(percentage: f64, increment: u32, block_count: usize) -> Self {
        let increment = increment.max(1);
        let percentage = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let blocks = (percentage / increment as f64).floor() as u32;

        Self {
            percentage: blocks * increment,
            filled_blocks: (blocks as usize).min(block_count),
        }
    }

    pub fn from_progress(progress: f64, increment: u32, block_count: usize) -> Self {
        Self::from_percentage(progress * 100.0, increment, block_count)
    }

    pub fn label(&self) -> String {
        format!("{}%", self.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_down_to_block() {
        let indicator = ProgressIndicator::from_percentage(37.0, 5, 20);
        assert_eq!(indicator.filled_blocks, 7);
        assert_eq!(indicator.label(), "35%");
    }

    #[test]
    fn full_and_empty() {
        assert_eq!(
            ProgressIndicator::from_progress(1.0, 5, 20),
            ProgressIndicator {
                percentage: 100,
                filled_blocks: 20
            }
        );
        assert_eq!(ProgressIndicator::from_progress(0.0, 5, 20).label(), "0%");
        assert_eq!(ProgressIndicator::from_percentage(f64::NAN, 5, 20).filled_blocks, 0);
    }

    #[test]
    fn filled_blocks_capped_by_bar_length() {
        let indicator = ProgressIndicator::from_percentage(100.0, 5, 10);
        assert_eq!(indicator.filled_blocks, 10);
        assert_eq!(indicator.percentage, 100);
    }
}
