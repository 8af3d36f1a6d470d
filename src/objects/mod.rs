//! Non-graphical objects (OBJECTS section)
//!
//! Named multileader and table styles, layouts and their page setup.

mod layout;
mod multileader_style;
mod plot_settings;
mod table_style;

pub use layout::Layout;
pub use multileader_style::{
    BlockConnectionType, MultiLeaderStyle, MultiLeaderStyleContent, StyleBlockContent,
    StyleMTextContent, TextAngleType,
};
pub use plot_settings::{PaperMargin, PlotRotation, PlotSettings};
pub use table_style::{RowCellStyle, TableStyle};
