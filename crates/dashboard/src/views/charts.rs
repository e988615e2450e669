//! Chart render targets.
//!
//! A canvas holds at most one live chart. Charts are created and released
//! through a [`ChartSurface`]; the caller keeps the returned [`ChartHandle`]
//! and must hand it back before drawing again on the same canvas.
//! [`ChartSlot`] owns that handle for one canvas and always releases before
//! creating.

use std::collections::HashMap;

use api_types::summary::SummaryResult;

/// The drawing areas that host a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasId {
    Category,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

/// Data needed to construct a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Series name, shown as legend when present.
    pub series: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    /// One pie slice per category.
    pub fn category(summary: &SummaryResult) -> Self {
        Self {
            kind: ChartKind::Pie,
            series: None,
            labels: summary
                .categories
                .iter()
                .map(|c| c.category.clone())
                .collect(),
            values: summary.categories.iter().map(|c| c.amount).collect(),
        }
    }

    /// One bar per month bucket, labeled `YYYY-MM`, in server order.
    pub fn trend(summary: &SummaryResult) -> Self {
        Self {
            kind: ChartKind::Bar,
            series: Some("Expense".to_string()),
            labels: summary
                .trend
                .iter()
                .map(|t| format!("{}-{:02}", t.y, t.m))
                .collect(),
            values: summary.trend.iter().map(|t| t.amount).collect(),
        }
    }

    /// Label/value pairs in display order.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Owned reference to the chart live on one canvas.
///
/// Not `Clone`: releasing consumes it, so a handle cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    canvas: CanvasId,
    id: u64,
}

impl ChartHandle {
    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Something able to host chart instances.
pub trait ChartSurface {
    fn create(&mut self, canvas: CanvasId, spec: ChartSpec) -> ChartHandle;
    fn release(&mut self, handle: ChartHandle);
}

/// Releases `previous` (if any), then creates the new chart on `canvas`.
pub fn replace_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    previous: Option<ChartHandle>,
    canvas: CanvasId,
    spec: ChartSpec,
) -> ChartHandle {
    if let Some(previous) = previous {
        surface.release(previous);
    }
    surface.create(canvas, spec)
}

/// The chart render target for one canvas.
#[derive(Debug)]
pub struct ChartSlot {
    canvas: CanvasId,
    handle: Option<ChartHandle>,
}

impl ChartSlot {
    pub fn new(canvas: CanvasId) -> Self {
        Self {
            canvas,
            handle: None,
        }
    }

    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    pub fn handle(&self) -> Option<&ChartHandle> {
        self.handle.as_ref()
    }

    pub fn render<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, spec: ChartSpec) {
        let previous = self.handle.take();
        self.handle = Some(replace_chart(surface, previous, self.canvas, spec));
    }

    pub fn clear<S: ChartSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(handle) = self.handle.take() {
            surface.release(handle);
        }
    }
}

#[derive(Debug)]
struct LiveChart {
    id: u64,
    spec: ChartSpec,
}

/// In-memory chart surface read by the terminal renderer.
///
/// Creating a chart on a canvas that still has a live one keeps both and
/// logs a warning, so a missing release shows up in [`ChartRegistry::live`].
#[derive(Debug, Default)]
pub struct ChartRegistry {
    next_id: u64,
    charts: HashMap<CanvasId, Vec<LiveChart>>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live charts on `canvas`.
    pub fn live(&self, canvas: CanvasId) -> usize {
        self.charts.get(&canvas).map_or(0, Vec::len)
    }

    /// The most recently created chart on `canvas`.
    pub fn current(&self, canvas: CanvasId) -> Option<&ChartSpec> {
        self.charts
            .get(&canvas)
            .and_then(|charts| charts.last())
            .map(|chart| &chart.spec)
    }
}

impl ChartSurface for ChartRegistry {
    fn create(&mut self, canvas: CanvasId, spec: ChartSpec) -> ChartHandle {
        self.next_id += 1;
        let charts = self.charts.entry(canvas).or_default();
        if !charts.is_empty() {
            tracing::warn!("{canvas:?} canvas already hosts {} chart(s)", charts.len());
        }
        charts.push(LiveChart {
            id: self.next_id,
            spec,
        });
        ChartHandle {
            canvas,
            id: self.next_id,
        }
    }

    fn release(&mut self, handle: ChartHandle) {
        if let Some(charts) = self.charts.get_mut(&handle.canvas) {
            charts.retain(|chart| chart.id != handle.id);
        }
    }
}
