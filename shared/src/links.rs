use crate::Place;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLink {
    pub name: &'static str,
    pub url: String,
}

/// Navigation links to a place, always in the order Google Maps, Apple Maps, Waze.
///
/// With coordinates every link targets the exact point. Without them Google
/// and Apple fall back to a text search and Waze is omitted.
pub fn map_links(place: &Place) -> Vec<MapLink> {
    match place.coordinates {
        Some(coord) => {
            let pair = format!("{},{}", coord.lat, coord.lon);
            vec![
                MapLink {
                    name: "Google Maps",
                    url: format!("https://www.google.com/maps/dir/?api=1&destination={pair}"),
                },
                MapLink {
                    name: "Apple Maps",
                    url: format!("https://maps.apple.com/?daddr={pair}"),
                },
                MapLink {
                    name: "Waze",
                    url: format!("https://waze.com/ul?ll={pair}&navigate=yes"),
                },
            ]
        }
        None if place.label.trim().is_empty() => Vec::new(),
        None => {
            let query = urlencoding::encode(place.label.trim());
            vec![
                MapLink {
                    name: "Google Maps",
                    url: format!("https://www.google.com/maps/dir/?api=1&destination={query}"),
                },
                MapLink {
                    name: "Apple Maps",
                    url: format!("https://maps.apple.com/?daddr={query}"),
                },
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    #[test]
    fn test_resolved_place_gets_all_links_in_order() {
        let place = Place::resolved(
            "Church Street",
            Coordinate {
                lat: 28.5421,
                lon: -81.379,
            },
        );
        let links = map_links(&place);
        let names: Vec<_> = links.iter().map(|l| l.name).collect();
        assert_eq!(names, ["Google Maps", "Apple Maps", "Waze"]);
        assert_eq!(
            links[0].url,
            "https://www.google.com/maps/dir/?api=1&destination=28.5421,-81.379"
        );
        assert_eq!(links[2].url, "https://waze.com/ul?ll=28.5421,-81.379&navigate=yes");
    }

    #[test]
    fn test_label_only_place_is_searched_by_text() {
        let links = map_links(&Place::unresolved("Lake Eola Park, Orlando"));
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].url, "https://maps.apple.com/?daddr=Lake%20Eola%20Park%2C%20Orlando");
    }

    #[test]
    fn test_blank_place_has_no_links() {
        assert!(map_links(&Place::unresolved(" ")).is_empty());
    }
}
