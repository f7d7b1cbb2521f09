//! Table View
//!
//! Renders the collection as a fixed-row-height table:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ TitleBar   [app-a] [app-b] ...      50000 rows│
//! ├──────────────────────────────────────────────┤
//! │ Header     id ┃ name ┃ score ┃ ...           │
//! ├──────────────────────────────────────────────┤
//! │ Body       (spacer of totalCount × rowHeight, │
//! │             only rendered rows positioned)    │
//! ├──────────────────────────────────────────────┤
//! │ StatusBar  rows 2000-2012 · fetching · error  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The body is a native scroll container around a spacer of the full dataset
//! height. A canvas reports the body bounds and scroll offset back to the
//! state every frame.

use crate::constants::{RESIZE_HANDLE_WIDTH, STATUS_BAR_HEIGHT};
use crate::domain::CollectionInfo;
use crate::services::{ServiceHub, run_in_tokio};
use crate::states::{TableLoadState, TableState};
use crate::theme::{ScopeColors, Typography};
use crate::viewport::{ColumnLayout, FetchOutcome, FetchPhase, RowSlot, TableBody, ViewportSnapshot};
use gpui::prelude::FluentBuilder;
use gpui::{
    AnyElement, ClickEvent, Context, Entity, FontWeight, IntoElement, MouseButton, MouseDownEvent,
    MouseMoveEvent, MouseUpEvent, ParentElement, Pixels, Render, ScrollHandle, SharedString,
    Styled, Window, canvas, div, point, prelude::*, px, relative,
};
use gpui_component::{h_flex, v_flex};
use std::sync::Arc;

/// Column edge being dragged
#[derive(Clone, Copy, Debug)]
struct ColumnDrag {
    index: usize,
    last_x: f32,
}

/// Main table view
pub struct TableView {
    state: Entity<TableState>,
    /// Collections offered in the title bar
    collections: Vec<CollectionInfo>,
    scroll_handle: ScrollHandle,
    drag: Option<ColumnDrag>,
}

impl TableView {
    pub fn new(
        state: Entity<TableState>,
        collections: Vec<CollectionInfo>,
        cx: &mut Context<Self>,
    ) -> Self {
        cx.observe(&state, |_this, _state, cx| cx.notify()).detach();

        Self {
            state,
            collections,
            scroll_handle: ScrollHandle::new(),
            drag: None,
        }
    }

    fn open_collection(&mut self, id: &str, cx: &mut Context<Self>) {
        self.scroll_handle.set_offset(point(px(0.0), px(0.0)));
        self.drag = None;
        self.state.update(cx, |state, cx| state.open_collection(id, cx));
    }

    fn refresh(&mut self, cx: &mut Context<Self>) {
        self.scroll_handle.set_offset(point(px(0.0), px(0.0)));
        self.state.update(cx, |state, cx| state.refresh(cx));
        self.reload_collections(cx);
    }

    /// Re-list the title bar collections from the store
    fn reload_collections(&mut self, cx: &mut Context<Self>) {
        let Some(hub) = cx.try_global::<ServiceHub>().cloned() else {
            return;
        };

        cx.spawn(async move |this, cx| {
            match run_in_tokio(async move { hub.list_collections().await }).await {
                Ok(collections) => {
                    this.update(cx, |view, cx| {
                        view.collections = collections;
                        cx.notify();
                    })
                    .ok();
                }
                Err(e) => tracing::warn!(error = %e, "Failed to list collections"),
            }
        })
        .detach();
    }

    fn on_drag_move(&mut self, event: &MouseMoveEvent, cx: &mut Context<Self>) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if event.pressed_button != Some(MouseButton::Left) {
            self.drag = None;
            return;
        }

        let x = f32::from(event.position.x);
        let delta = x - drag.last_x;
        drag.last_x = x;
        let index = drag.index;
        self.state
            .update(cx, |state, cx| state.resize_column(index, delta, cx));
    }

    /// Render the title bar with the collection switcher
    fn render_title_bar(&self, snapshot: &ViewportSnapshot, cx: &Context<Self>) -> impl IntoElement {
        let active = snapshot.collection.clone();

        h_flex()
            .flex_shrink_0()
            .h(px(36.0))
            .px_3()
            .gap_2()
            .items_center()
            .bg(ScopeColors::title_bg())
            .text_color(ScopeColors::text_light())
            .child(
                div()
                    .text_size(px(Typography::TEXT_BASE))
                    .font_weight(FontWeight::SEMIBOLD)
                    .child("Rowscope"),
            )
            .children(self.collections.iter().enumerate().map(|(ix, info)| {
                let id: Arc<str> = info.id.as_str().into();
                let is_active = active.as_deref() == Some(&*id);
                let label = SharedString::from(info.id.clone());

                div()
                    .id(("collection", ix))
                    .px_2()
                    .py_0p5()
                    .rounded_md()
                    .text_size(px(Typography::TEXT_XS))
                    .cursor_pointer()
                    .when(is_active, |d| {
                        d.bg(ScopeColors::content_bg())
                            .text_color(ScopeColors::text_primary())
                    })
                    .when(!is_active, |d| d.hover(|s| s.bg(ScopeColors::border_focus())))
                    .on_click(cx.listener(move |this, _: &ClickEvent, _window, cx| {
                        this.open_collection(&id, cx);
                    }))
                    .child(label)
            }))
            .child(div().flex_1())
            .when_some(snapshot.total_count, |d, total| {
                d.child(
                    div()
                        .text_size(px(Typography::TEXT_SM))
                        .child(format!("{total} rows")),
                )
            })
    }

    /// Render the header row with resize grips
    fn render_header(
        &self,
        columns: &ColumnLayout,
        header_height: f32,
        h_offset: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let dragging = self.drag.map(|d| d.index);

        let cells = columns.columns().iter().enumerate().map(|(ix, col)| {
            let is_dragging = dragging == Some(ix);

            div()
                .relative()
                .flex()
                .flex_shrink_0()
                .items_center()
                .w(px(col.width))
                .h_full()
                .px(px(Typography::CELL_PADDING_X))
                .overflow_hidden()
                .border_r_1()
                .border_color(ScopeColors::border())
                .child(
                    div()
                        .text_size(px(Typography::TEXT_SM))
                        .font_weight(FontWeight::MEDIUM)
                        .text_color(ScopeColors::text_primary())
                        .whitespace_nowrap()
                        .text_ellipsis()
                        .child(SharedString::from(col.label.to_string())),
                )
                .child(
                    div()
                        .id(("resize-grip", ix))
                        .absolute()
                        .top_0()
                        .right_0()
                        .h_full()
                        .w(px(RESIZE_HANDLE_WIDTH))
                        .cursor_col_resize()
                        .when(is_dragging, |d| d.bg(ScopeColors::border_focus()))
                        .hover(|s| s.bg(ScopeColors::border_focus()))
                        .on_mouse_down(
                            MouseButton::Left,
                            cx.listener(move |this, event: &MouseDownEvent, _window, cx| {
                                this.drag = Some(ColumnDrag {
                                    index: ix,
                                    last_x: f32::from(event.position.x),
                                });
                                cx.stop_propagation();
                                cx.notify();
                            }),
                        ),
                )
        });

        div()
            .id("table-header")
            .flex_shrink_0()
            .h(px(header_height))
            .overflow_hidden()
            .bg(ScopeColors::table_header_bg())
            .border_b_1()
            .border_color(ScopeColors::border())
            .child(
                div()
                    .flex()
                    .h_full()
                    .min_w(px(columns.total_width()))
                    .ml(h_offset)
                    .children(cells),
            )
    }

    /// Render one row slot at its absolute offset
    fn render_row(&self, slot: &RowSlot, columns: &ColumnLayout, row_height: f32) -> AnyElement {
        let index = slot.index();
        let bg = if index % 2 == 0 {
            ScopeColors::content_bg()
        } else {
            ScopeColors::table_row_alt()
        };

        let row = div()
            .absolute()
            .left_0()
            .top(px(slot.top()))
            .h(px(row_height))
            .w(px(columns.total_width()))
            .flex()
            .bg(bg)
            .border_b_1()
            .border_color(ScopeColors::border());

        match slot {
            RowSlot::Loaded { record, .. } => row
                .hover(|s| s.bg(ScopeColors::table_row_hover()))
                .children(columns.columns().iter().map(|col| {
                    div()
                        .flex()
                        .flex_shrink_0()
                        .items_center()
                        .w(px(col.width))
                        .h_full()
                        .px(px(Typography::CELL_PADDING_X))
                        .overflow_hidden()
                        .whitespace_nowrap()
                        .text_ellipsis()
                        .text_size(px(Typography::TEXT_SM))
                        .text_color(ScopeColors::text_primary())
                        .child(record.cell_text(&col.field))
                }))
                .into_any_element(),
            RowSlot::Placeholder { .. } => row
                .children(columns.columns().iter().map(|col| {
                    div()
                        .flex()
                        .flex_shrink_0()
                        .items_center()
                        .w(px(col.width))
                        .h_full()
                        .px(px(Typography::CELL_PADDING_X))
                        .child(
                            div()
                                .h(px(10.0))
                                .w(relative(0.6))
                                .rounded_sm()
                                .bg(ScopeColors::skeleton()),
                        )
                }))
                .into_any_element(),
        }
    }

    /// Centered message filling the body
    fn render_message(&self, message: impl Into<SharedString>, color: gpui::Rgba) -> AnyElement {
        div()
            .absolute()
            .top_0()
            .left_0()
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .text_size(px(Typography::TEXT_SM))
            .text_color(color)
            .child(message.into())
            .into_any_element()
    }

    /// Render the scrollable body
    fn render_body(&self, load_state: &TableLoadState, body: TableBody, cx: &Context<Self>) -> impl IntoElement {
        let state = self.state.read(cx);
        let columns = state.columns();
        let row_height = state.row_height();
        let total_height = state.total_height();

        let content: Vec<AnyElement> = match (load_state, body) {
            (TableLoadState::NoCollection, _) => vec![self.render_message(
                "No collection selected",
                ScopeColors::text_muted(),
            )],
            (TableLoadState::Error(error), _) => vec![self.render_message(
                format!("Failed to load: {error}"),
                ScopeColors::danger(),
            )],
            (_, TableBody::Loading) => {
                vec![self.render_message("Loading...", ScopeColors::text_muted())]
            }
            (_, TableBody::Empty) => {
                vec![self.render_message("No rows", ScopeColors::text_muted())]
            }
            (_, TableBody::Rows(rows)) if columns.is_empty() => {
                // Columns appear with the first non-empty page
                rows.iter()
                    .map(|slot| self.render_row(slot, columns, row_height))
                    .chain(std::iter::once(
                        self.render_message("Loading...", ScopeColors::text_muted()),
                    ))
                    .collect()
            }
            (_, TableBody::Rows(rows)) => rows
                .iter()
                .map(|slot| self.render_row(slot, columns, row_height))
                .collect(),
        };

        let state_entity = self.state.clone();
        let scroll_handle = self.scroll_handle.clone();

        div()
            .relative()
            .flex_1()
            .min_h_0()
            .child(
                div()
                    .id("table-body")
                    .size_full()
                    .overflow_scroll()
                    .track_scroll(&self.scroll_handle)
                    .child(
                        div()
                            .relative()
                            .w(px(columns.total_width()))
                            .min_w_full()
                            .h(px(total_height))
                            .min_h_full()
                            .children(content),
                    ),
            )
            // Report body height and scroll offset back to the state
            .child(
                canvas(
                    move |bounds, _window, cx| {
                        let offset = scroll_handle.offset();
                        state_entity.update(cx, |state, cx| {
                            state.set_viewport_height(f32::from(bounds.size.height), cx);
                            state.set_scroll_offset(-f32::from(offset.y), cx);
                        });
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full(),
            )
    }

    /// Render the status bar: visible rows, fetch phase and the last error
    fn render_status_bar(&self, snapshot: &ViewportSnapshot, cx: &Context<Self>) -> impl IntoElement {
        let rows = match (snapshot.tracked, snapshot.total_count) {
            (Some(tracked), Some(total)) => format!(
                "Rows {}-{} of {}",
                tracked.visible.first + 1,
                tracked.visible.last + 1,
                total
            ),
            (None, Some(0)) => "No rows".to_string(),
            _ => String::new(),
        };

        let (phase, phase_color) = match snapshot.phase {
            FetchPhase::Idle => ("Idle", ScopeColors::text_muted()),
            FetchPhase::PendingFetch => ("Waiting", ScopeColors::text_secondary()),
            FetchPhase::InFlight => ("Fetching", ScopeColors::warning()),
            FetchPhase::Settled(FetchOutcome::Success) => ("Up to date", ScopeColors::success()),
            FetchPhase::Settled(FetchOutcome::Error) => ("Failed", ScopeColors::danger()),
        };

        h_flex()
            .flex_shrink_0()
            .h(px(STATUS_BAR_HEIGHT))
            .px_3()
            .gap_4()
            .items_center()
            .bg(ScopeColors::status_bg())
            .border_t_1()
            .border_color(ScopeColors::border())
            .text_size(px(Typography::TEXT_XS))
            .text_color(ScopeColors::text_secondary())
            .child(rows)
            .child(div().text_color(phase_color).child(phase))
            .when_some(snapshot.error.clone(), |d, error| {
                d.child(
                    div()
                        .flex_1()
                        .overflow_hidden()
                        .whitespace_nowrap()
                        .text_ellipsis()
                        .text_color(ScopeColors::danger())
                        .child(SharedString::from(error.to_string())),
                )
            })
            .when(snapshot.error.is_none(), |d| d.child(div().flex_1()))
            .child(
                div()
                    .id("reload")
                    .px_2()
                    .rounded_md()
                    .cursor_pointer()
                    .hover(|s| s.bg(ScopeColors::table_row_hover()))
                    .on_click(cx.listener(|this, _: &ClickEvent, _window, cx| this.refresh(cx)))
                    .child("Reload"),
            )
    }
}

impl Render for TableView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let (snapshot, load_state, body, columns, header_height) = {
            let state = self.state.read(cx);
            (
                state.snapshot().clone(),
                state.load_state(),
                state.body(),
                state.columns().clone(),
                state.header_height(),
            )
        };
        let h_offset = self.scroll_handle.offset().x;

        v_flex()
            .id("table-view")
            .size_full()
            .bg(ScopeColors::background())
            .on_mouse_move(cx.listener(|this, event: &MouseMoveEvent, _window, cx| {
                this.on_drag_move(event, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _: &MouseUpEvent, _window, cx| {
                    if this.drag.take().is_some() {
                        cx.notify();
                    }
                }),
            )
            .child(self.render_title_bar(&snapshot, cx))
            .child(
                v_flex()
                    .flex_1()
                    .min_h_0()
                    .m_2()
                    .bg(ScopeColors::content_bg())
                    .border_1()
                    .border_color(ScopeColors::border())
                    .rounded_md()
                    .overflow_hidden()
                    .when(load_state.is_ready(), |d| {
                        d.child(self.render_header(&columns, header_height, h_offset, cx))
                    })
                    .child(self.render_body(&load_state, body, cx)),
            )
            .child(self.render_status_bar(&snapshot, cx))
    }
}
