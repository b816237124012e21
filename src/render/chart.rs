//! ECharts option builder
//!
//! Two grids side by side: candlesticks with target/current mark lines on the
//! left, the chip histogram as horizontal bars sharing the price range on the
//! right.

use serde_json::{json, Value};

use crate::analysis::PriceHistorySummary;

const UP: &str = "#00b894";
const DOWN: &str = "#e74c3c";
const TARGET: &str = "#f1c40f";
const BACKGROUND: &str = "#181b21";

/// Chart options for a history summary and target strike
pub fn chart_options(summary: &PriceHistorySummary, target_strike: f64) -> Value {
    let current = summary.current_price;

    // Below spot: holders under water on the red side
    let bars: Vec<Value> = summary
        .chips
        .buckets
        .iter()
        .map(|b| {
            let color = if b.price_midpoint < current { DOWN } else { UP };
            json!({"value": b.total_volume, "itemStyle": {"color": color}})
        })
        .collect();

    json!({
        "backgroundColor": BACKGROUND,
        "tooltip": {
            "trigger": "axis",
            "axisPointer": {"type": "cross"},
            "backgroundColor": "rgba(0,0,0,0.8)"
        },
        "grid": [
            {"left": "2%", "right": "35%", "top": "10%", "bottom": "10%"},
            {"left": "66%", "right": "2%", "top": "10%", "bottom": "10%"}
        ],
        "xAxis": [
            {"type": "category", "data": summary.dates, "gridIndex": 0, "axisLine": {"lineStyle": {"color": "#555"}}},
            {"type": "value", "gridIndex": 1, "splitLine": {"show": false}, "axisLabel": {"show": false}}
        ],
        "yAxis": [
            {
                "type": "value", "gridIndex": 0, "position": "right",
                "scale": true, "min": summary.min_axis, "max": summary.max_axis,
                "splitLine": {"lineStyle": {"color": "#333"}},
                "axisLabel": {"color": "#ccc", "margin": 10}
            },
            {"type": "category", "gridIndex": 1, "data": summary.chips.labels(), "show": false}
        ],
        "dataZoom": [{"type": "inside", "xAxisIndex": 0, "start": 60, "end": 100}],
        "series": [
            {
                "name": "股价",
                "type": "candlestick",
                "data": summary.kline,
                "itemStyle": {"color": UP, "color0": DOWN, "borderColor": UP, "borderColor0": DOWN},
                "markLine": {
                    "symbol": "none",
                    "silent": true,
                    "data": [
                        mark_line(target_strike, &format!("Target: {:?}", target_strike), TARGET),
                        mark_line(current, &format!("Current: {:?}", current), "#fff")
                    ]
                }
            },
            {
                "name": "筹码",
                "type": "bar",
                "xAxisIndex": 1,
                "yAxisIndex": 1,
                "data": bars,
                "barWidth": "60%",
                "itemStyle": {"opacity": 0.6}
            }
        ]
    })
}

fn mark_line(price: f64, label: &str, color: &str) -> Value {
    json!({
        "yAxis": price,
        "label": {"formatter": label, "position": "end", "color": color},
        "lineStyle": {"color": color, "type": "dashed"}
    })
}
