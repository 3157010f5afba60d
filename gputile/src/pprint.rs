use crate::point::ConfigPoint;
use crate::utils::join_into_string;

use prettytable::{self, format, row};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PointPrintStyle {
    Full,
    Compact,
}

/// Pretty-print [ConfigPoint]s to stdout.
pub fn pprint_points<'a>(points: impl IntoIterator<Item = &'a ConfigPoint>, style: PointPrintStyle) {
    points_table(points, style).printstd()
}

/// Pretty-print [ConfigPoint]s to a given [fmt::Write].
pub fn pprint_write<'a, W>(
    out: &mut W,
    points: impl IntoIterator<Item = &'a ConfigPoint>,
    style: PointPrintStyle,
) -> fmt::Result
where
    W: fmt::Write,
{
    write!(out, "{}", points_table(points, style))
}

pub fn pprint_string<'a>(
    points: impl IntoIterator<Item = &'a ConfigPoint>,
    style: PointPrintStyle,
) -> String {
    format!("{}", points_table(points, style))
}

fn points_table<'a>(
    points: impl IntoIterator<Item = &'a ConfigPoint>,
    style: PointPrintStyle,
) -> prettytable::Table {
    let mut table = prettytable::Table::new();
    let titles = match style {
        PointPrintStyle::Full => row!["Index", "Tiles", "Threads", "Feature"],
        PointPrintStyle::Compact => row!["Index", "Tiles"],
    };
    table.set_titles(titles);

    for point in points {
        let tiles = join_into_string(point.tiles(), "x");
        let r = match style {
            PointPrintStyle::Full => row![
                point.index(),
                tiles,
                point.threads(),
                format!("{:.4}", point.feature()[0])
            ],
            PointPrintStyle::Compact => row![point.index(), tiles],
        };
        table.add_row(r);
    }

    let format = format::FormatBuilder::new()
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('-', ' ', ' ', ' '),
        )
        .column_separator(' ')
        .build();
    table.set_format(format);
    table
}
