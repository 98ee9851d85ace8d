use egui::{epaint::Mesh, Pos2, Shape};
use walkers::Projector;

use crate::surface::Overlay;

impl Overlay {
    pub(super) fn draw(&self, ui: &mut egui::Ui, projector: &Projector) {
        let points: Vec<Pos2> = self
            .geometry
            .positions()
            .map(|position| projector.project(position).to_pos2())
            .collect();

        let fill = self.style.fill();
        if fill.a() > 0 {
            let mut mesh = Mesh::default();
            for point in &points {
                mesh.colored_vertex(*point, fill);
            }
            for [a, b, c] in self.geometry.triangles() {
                mesh.add_triangle(*a as u32, *b as u32, *c as u32);
            }
            ui.painter().add(Shape::mesh(mesh));
        }

        ui.painter()
            .add(Shape::closed_line(points, self.style.stroke()));
    }
}
