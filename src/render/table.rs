//! Option horizon table
//!
//! HTML for the dark-themed page and plain text for terminals. Neither shows
//! why a horizon is missing; an empty table is a single "no data" notice.

use std::fmt::Write;

use crate::analysis::CostTierConfig;
use crate::core::HorizonResult;

pub const NO_DATA: &str = "暂无数据";

/// Stylesheet matching the classes `html_table` emits
pub const TABLE_CSS: &str = r#"
.opt-container { background-color: #181b21; border-radius: 12px; border: 1px solid #333; border-left: 3px solid #3498db; font-family: 'Segoe UI', sans-serif; overflow: hidden; }
.opt-header-box { padding: 15px; border-bottom: 1px solid #333; }
.opt-title { font-size: 18px; font-weight: bold; color: #fff; margin: 0; }
.opt-sub { font-size: 12px; color: #888; margin-top: 5px; }
.opt-table-header { display: flex; background-color: #1e2126; color: #888; font-size: 12px; padding: 8px 10px; border-bottom: 1px solid #333; }
.opt-row { display: flex; align-items: center; padding: 12px 10px; border-bottom: 1px solid #2b2b2b; }
.opt-row:last-child { border-bottom: none; }
.col-period { width: 15%; }
.col-price { width: 25%; }
.col-dist { width: 20%; text-align: right; font-weight: bold; font-size: 13px; }
.col-ratio { width: 25%; text-align: right; }
.col-iv { width: 15%; text-align: right; color: #666; font-size: 11px; }
.text-main { font-size: 14px; font-weight: bold; color: #fff; margin-bottom: 2px; }
.text-sub { font-size: 11px; color: #666; }
.dist-active { color: #00b894; font-weight: bold; }
.dist-gray { color: #666; }
.tag-ratio { display: inline-block; padding: 3px 8px; border-radius: 4px; font-size: 12px; font-weight: bold; }
.tag-red { background: rgba(231, 76, 60, 0.2); color: #e74c3c; }
.tag-green { background: rgba(0, 184, 148, 0.2); color: #00b894; }
.tag-yellow { background: rgba(241, 196, 15, 0.2); color: #f1c40f; }
"#;

/// HTML fragment for the horizon rows, cost ratios tagged per `tiers`
pub fn html_table(
    rows: &[HorizonResult],
    target_strike: f64,
    tiers: &CostTierConfig,
) -> String {
    if rows.is_empty() {
        return format!(
            "<div style='padding:20px; text-align:center; color:#666;'>{}</div>",
            NO_DATA
        );
    }

    let mut body = String::new();
    for row in rows {
        let _ = write!(
            body,
            r#"
<div class="opt-row">
<div class="col-period"><div class="text-main">{period}</div><div class="text-sub">{date}</div></div>
<div class="col-price"><div class="text-main">${price:.2}</div><div class="text-sub">Strike: {strike}</div></div>
<div class="col-dist {dist_cls}">{dist:+.2}%</div>
<div class="col-ratio"><span class="tag-ratio {ratio_cls}">{ratio:.2}%</span></div>
<div class="col-iv">{iv:.1}%</div>
</div>"#,
            period = escape(&row.period_label),
            date = row.expiration,
            price = row.last_price,
            strike = row.strike,
            dist_cls = row.distance_style().css_class(),
            dist = row.distance_pct,
            ratio_cls = row.cost_tier(tiers).css_class(),
            ratio = row.cost_ratio_pct,
            iv = row.implied_vol_pct,
        );
    }

    format!(
        r#"
<div class="opt-container">
<div class="opt-header-box">
<h3 class="opt-title">Call 期权链分析</h3>
<div class="opt-sub">目标行权价: ${target}</div>
</div>
<div class="opt-table-header">
<div class="col-period">周期</div>
<div class="col-price">Call价格</div>
<div class="col-dist">距现价</div>
<div class="col-ratio">成本比</div>
<div class="col-iv">IV</div>
</div>
<div class="opt-body">{body}
</div>
</div>
"#,
        target = target_strike,
        body = body,
    )
}

/// Fixed-width text table
pub fn text_table(rows: &[HorizonResult], tiers: &CostTierConfig) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<10} {:>9} {:>9} {:>9} {:>8} {:>6}  {}",
        "Period", "Expiry", "Price", "Strike", "Dist", "Cost", "IV", "Tier"
    );
    let _ = writeln!(out, "{}", "-".repeat(76));

    for row in rows {
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:>9.2} {:>9.2} {:>+8.2}% {:>7.2}% {:>5.1}%  {:?}",
            row.period_label,
            row.expiration.format("%Y-%m-%d").to_string(),
            row.last_price,
            row.strike,
            row.distance_pct,
            row.cost_ratio_pct,
            row.implied_vol_pct,
            row.cost_tier(tiers),
        );
    }

    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
