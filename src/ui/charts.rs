use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::analytics::{customers, operations, products, sales};
use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Per-tab charts over the filtered view
// ---------------------------------------------------------------------------

fn empty_notice(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No data available for the selected filters.");
    });
}

// ---- Sales tab ----

pub fn sales_tab(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        empty_notice(ui);
        return;
    }

    let table = &state.table;
    let indices = &state.visible_indices;
    let height = (ui.available_height() / 2.0 - 24.0).max(120.0);

    ui.strong("Monthly revenue");
    let monthly = sales::monthly_revenue(table, indices);
    Plot::new("monthly_revenue")
        .legend(Legend::default())
        .height(height)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = monthly
                .iter()
                .enumerate()
                .map(|(i, (month, revenue))| Bar::new(i as f64, *revenue).name(month).width(0.6))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("Revenue"));
        });

    ui.separator();
    ui.columns(2, |columns| {
        let colors = ColorMap::new(table.categories.iter().cloned());

        columns[0].strong("Top categories");
        let top = sales::top_categories(table, indices, 5);
        Plot::new("top_categories")
            .legend(Legend::default())
            .height(height)
            .show(&mut columns[0], |plot_ui| {
                for (i, (category, revenue)) in top.iter().enumerate() {
                    let bar = Bar::new(i as f64, *revenue).name(category).width(0.6);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .name(category)
                            .color(colors.color_for(category)),
                    );
                }
            });

        columns[1].strong("Revenue by country");
        let geo = sales::country_performance(table, indices);
        Plot::new("country_revenue")
            .legend(Legend::default())
            .height(height)
            .show(&mut columns[1], |plot_ui| {
                for (i, perf) in geo.iter().enumerate() {
                    let bar = Bar::new(i as f64, perf.revenue).name(&perf.country).width(0.6);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).name(&perf.country));
                }
            });
    });
}

// ---- Customers tab ----

pub fn customers_tab(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        empty_notice(ui);
        return;
    }

    let labels = state.segment_labels().to_vec();
    let metrics = customers::customer_metrics(
        &state.table,
        &state.visible_indices,
        AppState::today(),
        labels.len(),
    );
    let colors = ColorMap::new(labels.iter().cloned());
    let height = (ui.available_height() - 72.0).max(120.0) / 2.0;

    ui.strong("Customer value vs recency");
    Plot::new("customer_scatter")
        .legend(Legend::default())
        .x_axis_label("Recency (days)")
        .y_axis_label("Total revenue")
        .height(height)
        .show(ui, |plot_ui| {
            for (segment, label) in labels.iter().enumerate() {
                let points: PlotPoints = metrics
                    .iter()
                    .filter(|m| m.segment == segment)
                    .filter_map(|m| m.recency.map(|r| [r as f64, m.monetary]))
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(label)
                        .color(colors.color_for(label))
                        .radius(3.0),
                );
            }
        });

    ui.separator();
    ui.strong("Segment distribution");
    let counts = customers::segment_counts(&metrics, labels.len());
    Plot::new("segment_counts")
        .legend(Legend::default())
        .height(height)
        .show(ui, |plot_ui| {
            for (segment, label) in labels.iter().enumerate() {
                let bar = Bar::new(segment as f64, counts[segment] as f64)
                    .name(label)
                    .width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(label)
                        .color(colors.color_for(label)),
                );
            }
        });
}

// ---- Products tab ----

pub fn products_tab(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        empty_notice(ui);
        return;
    }

    let stats = products::product_performance(&state.table, &state.visible_indices);
    let colors = ColorMap::new(state.table.categories.iter().cloned());
    let height = (ui.available_height() - 72.0).max(120.0) / 2.0;

    ui.strong("Revenue vs margin by product");
    Plot::new("product_scatter")
        .legend(Legend::default())
        .x_axis_label("Total revenue")
        .y_axis_label("Mean margin (%)")
        .height(height)
        .show(ui, |plot_ui| {
            for category in &state.table.categories {
                let points: PlotPoints = stats
                    .iter()
                    .filter(|p| p.category.as_deref() == Some(category))
                    .filter_map(|p| p.mean_margin.map(|m| [p.total_revenue, m]))
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(colors.color_for(category))
                        .radius(3.0),
                );
            }
        });

    ui.separator();
    ui.strong("Top products");
    Plot::new("top_products")
        .legend(Legend::default())
        .height(height)
        .show(ui, |plot_ui| {
            for (i, product) in stats.iter().take(10).enumerate() {
                let bar = Bar::new(i as f64, product.total_revenue)
                    .name(&product.product_name)
                    .width(0.6);
                let mut chart = BarChart::new(vec![bar]).name(&product.product_name);
                if let Some(category) = &product.category {
                    chart = chart.color(colors.color_for(category));
                }
                plot_ui.bar_chart(chart);
            }
        });
}

// ---- Operations tab ----

pub fn operations_tab(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        empty_notice(ui);
        return;
    }

    let groups = operations::fulfillment_groups(&state.table, &state.visible_indices);
    let height = (ui.available_height() - 72.0).max(120.0) / 2.0;

    ui.strong("Fulfillment time by country / maintenance");
    Plot::new("fulfillment_box")
        .legend(Legend::default())
        .y_axis_label("Order to ship (days)")
        .height(height)
        .show(ui, |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let Some([lo, q1, median, q3, hi]) =
                    operations::five_number_summary(&group.order_to_ship)
                else {
                    continue;
                };
                let name = format!(
                    "{} / {}",
                    group.country.as_deref().unwrap_or("(unknown)"),
                    group.maintenance.as_deref().unwrap_or("(unknown)")
                );
                let elem = BoxElem::new(i as f64, BoxSpread::new(lo, q1, median, q3, hi));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&name));
            }
        });

    ui.separator();
    ui.strong("Shipping delay distribution");
    let delays = operations::ship_delay_samples(&state.table, &state.visible_indices);
    Plot::new("ship_delay_hist")
        .legend(Legend::default())
        .x_axis_label("Ship delay (days, negative = late)")
        .height(height)
        .show(ui, |plot_ui| {
            let mut counts: std::collections::BTreeMap<i64, usize> = Default::default();
            for d in &delays {
                *counts.entry(d.round() as i64).or_insert(0) += 1;
            }
            let bars: Vec<Bar> = counts
                .into_iter()
                .map(|(day, count)| Bar::new(day as f64, count as f64).width(0.8))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("Orders"));
        });
}
