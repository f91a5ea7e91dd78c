use std::error::Error;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{AggregateSeries, ChartKind, TimeSeries, Totals};
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

const INCOME_COLOR: RGBColor = RGBColor(0xFC, 0xD3, 0x4D);
const EXPENSE_COLOR: RGBColor = RGBColor(0xE0, 0x7A, 0x00);
const AXIS_COLOR: RGBColor = RGBColor(120, 113, 108);
const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 350;

type DrawResult = Result<(), Box<dyn Error>>;

#[derive(Properties, PartialEq)]
pub struct TransactionChartProps {
    pub aggregates: AggregateSeries,
    pub kind: ChartKind,
    pub loading: bool,
    pub on_kind_change: Callback<ChartKind>,
}

/// Income/expense chart drawn with plotters onto a canvas.
pub struct TransactionChart {
    canvas_ref: NodeRef,
}

impl Component for TransactionChart {
    type Message = ();
    type Properties = TransactionChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
        }
    }

    // The canvas only exists after the first render, so drawing happens here
    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        let props = ctx.props();
        if has_data(props.kind, &props.aggregates) {
            self.draw(props);
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        let body = if props.loading {
            html! { <div class="chart-loading">{"Loading chart data..."}</div> }
        } else if !has_data(props.kind, &props.aggregates) {
            html! { <div class="chart-empty">{"No data to chart"}</div> }
        } else {
            html! {
                <canvas
                    ref={self.canvas_ref.clone()}
                    class="transaction-chart-canvas"
                    width={CANVAS_WIDTH.to_string()}
                    height={CANVAS_HEIGHT.to_string()}
                ></canvas>
            }
        };

        html! {
            <section class="transaction-chart">
                <div class="chart-header">
                    <h2>{"Income vs expense"}</h2>
                    <div class="chart-kind-selector">
                        {for ChartKind::ALL.iter().map(|kind| {
                            let kind = *kind;
                            html! {
                                <button
                                    class={classes!("chart-kind-btn", (kind == props.kind).then_some("active"))}
                                    onclick={props.on_kind_change.reform(move |_| kind)}
                                >
                                    {kind.label()}
                                </button>
                            }
                        })}
                    </div>
                </div>
                {body}
            </section>
        }
    }
}

impl TransactionChart {
    fn draw(&self, props: &TransactionChartProps) {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return;
        };
        // Resetting the size also clears what was drawn before
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);

        let Some(backend) = CanvasBackend::with_canvas_object(canvas) else {
            tracing::warn!("canvas has no 2d context");
            return;
        };
        let root = backend.into_drawing_area();

        if let Err(e) = render(&root, props.kind, &props.aggregates) {
            tracing::warn!("failed to draw {} chart: {e}", props.kind.label());
        }
    }
}

fn render(
    root: &DrawingArea<CanvasBackend, Shift>,
    kind: ChartKind,
    aggregates: &AggregateSeries,
) -> DrawResult {
    root.fill(&WHITE)?;
    match kind {
        ChartKind::Donut => draw_donut(root, &aggregates.totals),
        ChartKind::Bar => draw_bars(root, &aggregates.totals),
        ChartKind::Line => draw_lines(root, &aggregates.series),
    }
}

/// Whether `kind` has anything to show for these aggregates.
fn has_data(kind: ChartKind, aggregates: &AggregateSeries) -> bool {
    match kind {
        ChartKind::Donut | ChartKind::Bar => !aggregates.totals.is_zero(),
        ChartKind::Line => !aggregates.series.is_empty(),
    }
}

/// Upper bound of the value axis, with headroom above the largest value.
fn value_axis_max(largest: f64) -> f64 {
    if largest.is_finite() && largest > 0.0 {
        largest * 1.1
    } else {
        1.0
    }
}

fn draw_donut(root: &DrawingArea<CanvasBackend, Shift>, totals: &Totals) -> DrawResult {
    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.4;

    let sizes = [totals.income, totals.expense];
    let colors = [INCOME_COLOR, EXPENSE_COLOR];
    let labels = ["Income", "Expense"];

    let mut pie = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
    pie.donut_hole(radius * 0.55);
    pie.label_style(("sans-serif", 16).into_font().color(&AXIS_COLOR));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    root.draw(&pie)?;
    root.present()?;
    Ok(())
}

fn draw_bars(root: &DrawingArea<CanvasBackend, Shift>, totals: &Totals) -> DrawResult {
    let y_max = value_axis_max(totals.income.max(totals.expense));

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..2u32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .axis_style(AXIS_COLOR)
        .label_style(("sans-serif", 12, &AXIS_COLOR))
        .x_label_formatter(&|value| {
            match value {
                SegmentValue::CenterOf(0) => "Income",
                SegmentValue::CenterOf(1) => "Expense",
                _ => "",
            }
            .to_string()
        })
        .y_label_formatter(&|amount| format!("{amount:.0}"))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(INCOME_COLOR.filled())
            .margin(40)
            .data([(0u32, totals.income)]),
    )?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(EXPENSE_COLOR.filled())
            .margin(40)
            .data([(1u32, totals.expense)]),
    )?;

    root.present()?;
    Ok(())
}

fn draw_lines(root: &DrawingArea<CanvasBackend, Shift>, series: &TimeSeries) -> DrawResult {
    let labels = series.labels();
    let last = (series.len() as i32 - 1).max(1);
    let y_max = value_axis_max(series.max_amount());

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0i32..last, 0f64..y_max)?;

    chart
        .configure_mesh()
        .axis_style(AXIS_COLOR)
        .bold_line_style(RGBColor(245, 245, 244))
        .light_line_style(RGBColor(250, 250, 249))
        .label_style(("sans-serif", 12, &AXIS_COLOR))
        .x_labels(labels.len().min(8))
        .x_label_formatter(&|index| {
            usize::try_from(*index)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|amount| format!("{amount:.0}"))
        .draw()?;

    let buckets = series.buckets();
    chart
        .draw_series(LineSeries::new(
            buckets.iter().enumerate().map(|(i, b)| (i as i32, b.income)),
            INCOME_COLOR.stroke_width(3),
        ))?
        .label("Income")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], INCOME_COLOR.stroke_width(3)));
    chart
        .draw_series(LineSeries::new(
            buckets.iter().enumerate().map(|(i, b)| (i as i32, b.expense)),
            EXPENSE_COLOR.stroke_width(3),
        ))?
        .label("Expense")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], EXPENSE_COLOR.stroke_width(3)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(AXIS_COLOR)
        .draw()?;

    root.present()?;
    Ok(())
}
