use eframe::egui::{Align2, FontId, Pos2, Sense, Stroke, Ui, Vec2};

use paser_dashboards::color::{experiment_color, translucent};

const SIZE: Vec2 = Vec2::new(360.0, 320.0);
const RADIUS: f32 = 90.0;

/// Circle centres around the origin for a 2 or 3 set diagram.
fn centers(n: usize) -> Vec<Vec2> {
    match n {
        2 => vec![Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)],
        _ => vec![
            Vec2::new(-50.0, -28.0),
            Vec2::new(50.0, -28.0),
            Vec2::new(0.0, 56.0),
        ],
    }
}

/// Where to print the count of region `mask`: the mean of the member
/// centres, pushed away from the overall centroid.
fn region_anchor(mask: usize, centers: &[Vec2]) -> Vec2 {
    let members: Vec<Vec2> = centers
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, c)| *c)
        .collect();
    let mean = members.iter().fold(Vec2::ZERO, |acc, c| acc + *c) / members.len() as f32;
    let centroid = centers.iter().fold(Vec2::ZERO, |acc, c| acc + *c) / centers.len() as f32;
    let push = match members.len() {
        1 => 0.8,
        n if n == centers.len() => 0.0,
        _ => 0.6,
    };
    mean + (mean - centroid) * push
}

/// Draw a 2 or 3 set Venn diagram. `regions[mask]` is the number of keys in
/// exactly the sets of `mask`, as produced by `venn_regions`.
pub fn venn_diagram(ui: &mut Ui, title: &str, labels: &[String], regions: &[usize]) {
    let n = labels.len();
    ui.strong(title);
    if !(2..=3).contains(&n) || regions.len() != 1 << n {
        ui.label("Venn diagrams need 2 or 3 experiments.");
        return;
    }

    let (response, painter) = ui.allocate_painter(SIZE, Sense::hover());
    let origin: Pos2 = response.rect.center();
    let centers = centers(n);
    let text_color = ui.visuals().text_color();
    let centroid = centers.iter().fold(Vec2::ZERO, |acc, c| acc + *c) / n as f32;

    for (i, center) in centers.iter().enumerate() {
        let color = experiment_color(i, n);
        painter.circle(
            origin + *center,
            RADIUS,
            translucent(color, 70),
            Stroke::new(2.0, color),
        );
        let outward = (*center - centroid).normalized();
        painter.text(
            origin + *center + outward * (RADIUS + 12.0),
            Align2::CENTER_CENTER,
            &labels[i],
            FontId::proportional(15.0),
            color,
        );
    }

    for (mask, count) in regions.iter().enumerate().skip(1) {
        painter.text(
            origin + region_anchor(mask, &centers),
            Align2::CENTER_CENTER,
            count.to_string(),
            FontId::proportional(16.0),
            text_color,
        );
    }

    response.on_hover_text("Counts are distinct keys found in exactly the overlapping experiments.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(p: Vec2, c: Vec2) -> bool {
        (p - c).length() < RADIUS
    }

    #[test]
    fn region_anchors_lie_in_their_regions() {
        for n in [2, 3] {
            let cs = centers(n);
            for mask in 1..(1usize << n) {
                let p = region_anchor(mask, &cs);
                for (i, c) in cs.iter().enumerate() {
                    assert_eq!(inside(p, *c), mask & (1 << i) != 0, "n={n} mask={mask:b} set={i}");
                }
            }
        }
    }
}
