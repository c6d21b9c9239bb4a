use crate::types::rows::*;
use polars::prelude::*;

/// A transformed table with exactly the [`OUTPUT_COLUMNS`], in order.
///
/// Only [`crate::transform`] constructs one, so the column layout can be
/// relied on by the writer and by [`DailyOutlook::rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOutlook {
    pub frame: DataFrame,
}

impl DailyOutlook {
    pub(crate) fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// First `n` rows, for console previews.
    pub fn head(&self, n: usize) -> DataFrame {
        self.frame.head(Some(n))
    }

    /// Materializes the table as typed rows.
    pub fn rows(&self) -> PolarsResult<Vec<EnrichedRow>> {
        let date = self.frame.column(COL_DATE)?.str()?;
        let tavg = self.frame.column(COL_TAVG)?.f64()?;
        let tmin = self.frame.column(COL_TMIN)?.f64()?;
        let tmax = self.frame.column(COL_TMAX)?.f64()?;
        let prcp = self.frame.column(COL_PRCP)?.f64()?;
        let temp_range = self.frame.column(COL_TEMP_RANGE)?.f64()?;
        let day = self.frame.column(COL_DAY)?.str()?;
        let is_rainy = self.frame.column(COL_IS_RAINY)?.i32()?;
        let is_hot = self.frame.column(COL_IS_HOT)?.i32()?;

        Ok((0..self.frame.height())
            .map(|i| EnrichedRow {
                date: date.get(i).unwrap_or_default().to_string(),
                tavg: tavg.get(i),
                tmin: tmin.get(i),
                tmax: tmax.get(i),
                prcp: prcp.get(i),
                temp_range: temp_range.get(i),
                day: day.get(i).map(str::to_string),
                is_rainy: is_rainy.get(i).unwrap_or(0),
                is_hot: is_hot.get(i).unwrap_or(0),
            })
            .collect())
    }
}
