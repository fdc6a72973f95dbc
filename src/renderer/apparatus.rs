//! Editorial apparatus: every reading is drawn in place, coloured by rank.

use super::{ElementCtx, LayerPass, View};
use crate::device::DeviceContext;
use crate::error::RenderResult;
use crate::model::LayerApp;

impl<'a> View<'a> {
    pub(super) fn draw_app(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, app: &LayerApp, pass: &mut LayerPass) -> RenderResult<()> {
        let staff = cx.staff_ctx();
        for (i, reading) in app.readings.iter().enumerate() {
            let color = if i == 0 {
                self.options.colors.first_reading
            } else {
                self.options.colors.other_reading
            };
            let scope = cx.scope.with_color(color);
            dc.start_graphic("rdg", &reading.id);
            let result = reading
                .children
                .iter()
                .try_for_each(|child| self.draw_element(dc, child, Some(&mut *pass), cx.measure, Some(&staff), scope));
            dc.end_graphic("rdg", &reading.id);
            result?;
        }
        Ok(())
    }
}
