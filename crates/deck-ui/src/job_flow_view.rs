//! Draws the job-flow demo from a sequencer snapshot

use egui::{Align2, Color32, FontId, Id, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use deck_core::job_flow::{cluster_entity, queue_entity, JobState, CLUSTERS, HUB, JOB, QUEUES};
use deck_core::{EntitySnapshot, EntityStatus, Point, SequencerState};

use crate::theme::{highlight_color, muted_color, status_color};

/// What the viewer asked the demo to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAction {
    Submit(&'static str),
    Play,
    Pause,
    Step,
}

/// Extent of the diagram coordinate space used by the job-flow script
const DIAGRAM_SIZE: Vec2 = Vec2::new(420.0, 120.0);

#[derive(Debug, Clone)]
pub struct JobFlowView {
    pub node_size: Vec2,
    pub canvas_height: f32,
    /// Seconds the job marker takes to glide between positions
    pub glide_time: f32,
}

impl Default for JobFlowView {
    fn default() -> Self {
        Self {
            node_size: Vec2::new(170.0, 44.0),
            canvas_height: 300.0,
            glide_time: 0.4,
        }
    }
}

impl JobFlowView {
    pub fn ui(&self, ui: &mut Ui, state: &SequencerState, active_queue: &str) -> Option<DemoAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label("Submit a job to:");
            for queue in &QUEUES {
                let text = format!("{} {}", queue.icon, queue.name);
                if ui.selectable_label(queue.id == active_queue, text).clicked() {
                    action = Some(DemoAction::Submit(queue.id));
                }
            }

            ui.separator();

            let (icon, hover, toggle) = if state.is_running {
                ("⏸", "Pause", DemoAction::Pause)
            } else {
                ("▶", "Play", DemoAction::Play)
            };
            if ui.button(icon).on_hover_text(hover).clicked() {
                action = Some(toggle);
            }
            if ui.button("⏭").on_hover_text("Next stage").clicked() {
                action = Some(DemoAction::Step);
            }
        });

        ui.add_space(8.0);
        self.status_line(ui, state);
        ui.add_space(8.0);

        let size = Vec2::new(ui.available_width(), self.canvas_height);
        let (canvas, _) = ui.allocate_exact_size(size, Sense::hover());
        self.draw_links(ui, canvas, state);
        for (id, entity) in &state.entities {
            if id != JOB {
                self.draw_node(ui, canvas, entity);
            }
        }
        if let Some(job) = state.entity(JOB) {
            self.draw_job(ui, canvas, job);
        }

        action
    }

    fn status_line(&self, ui: &mut Ui, state: &SequencerState) {
        let job_state = state
            .entity(JOB)
            .map(|job| JobState::from_label(&job.label))
            .unwrap_or_default();

        ui.label(
            RichText::new(format!("{} {}", job_state.icon(), job_state.message()))
                .size(20.0)
                .color(highlight_color()),
        );
    }

    /// Map a diagram point to the top-left corner of a node inside `canvas`
    fn to_screen(&self, canvas: Rect, point: Point) -> Pos2 {
        let usable = canvas.size() - self.node_size;
        canvas.min + Vec2::new(
            point.x / DIAGRAM_SIZE.x * usable.x.max(0.0),
            point.y / DIAGRAM_SIZE.y * usable.y.max(0.0),
        )
    }

    fn node_rect(&self, canvas: Rect, point: Point) -> Rect {
        Rect::from_min_size(self.to_screen(canvas, point), self.node_size)
    }

    fn draw_links(&self, ui: &Ui, canvas: Rect, state: &SequencerState) {
        let Some(hub) = state.entity(HUB) else {
            return;
        };
        let hub_rect = self.node_rect(canvas, hub.position);
        let stroke = Stroke::new(1.5, muted_color());

        for queue in &QUEUES {
            if let Some(entity) = state.entity(&queue_entity(queue.id)) {
                let rect = self.node_rect(canvas, entity.position);
                ui.painter().line_segment([rect.right_center(), hub_rect.left_center()], stroke);
            }
        }
        for cluster in &CLUSTERS {
            if let Some(entity) = state.entity(&cluster_entity(cluster.id)) {
                let rect = self.node_rect(canvas, entity.position);
                let stroke = if entity.status == EntityStatus::Idle {
                    stroke
                } else {
                    Stroke::new(2.5, status_color(entity.status))
                };
                ui.painter().line_segment([hub_rect.right_center(), rect.left_center()], stroke);
            }
        }
    }

    fn draw_node(&self, ui: &Ui, canvas: Rect, entity: &EntitySnapshot) {
        if entity.status == EntityStatus::Hidden {
            return;
        }
        let rect = self.node_rect(canvas, entity.position);
        let painter = ui.painter();

        painter.rect_filled(rect, Rounding::same(8.0), status_color(entity.status));
        painter.rect_stroke(rect, Rounding::same(8.0), Stroke::new(1.0, muted_color()));
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            &entity.label,
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    fn draw_job(&self, ui: &Ui, canvas: Rect, job: &EntitySnapshot) {
        if job.status == EntityStatus::Hidden {
            return;
        }

        let ctx = ui.ctx();
        let x = ctx.animate_value_with_time(Id::new("demo_job_x"), job.position.x, self.glide_time);
        let y = ctx.animate_value_with_time(Id::new("demo_job_y"), job.position.y, self.glide_time);
        let center = self.node_rect(canvas, Point::new(x, y)).center();

        let painter = ui.painter();
        painter.circle_filled(center, 14.0, status_color(job.status));
        painter.circle_stroke(center, 14.0, Stroke::new(2.0, Color32::WHITE));
        painter.text(center, Align2::CENTER_CENTER, "📦", FontId::proportional(14.0), Color32::WHITE);
    }
}
