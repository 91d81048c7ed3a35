//! Mining and block placement resolvers.
//!
//! Pure rule functions over the map and player state. They validate
//! first and mutate only on acceptance, so a rejected action leaves the
//! room exactly as it was. Event fan-out happens in the room state.

use rand::Rng;
use tilefort_world::{Item, Position, Tile, TileKind, TileMap, ToolKind};

use crate::Player;

/// What a successful mining hit did.
#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    /// The tile lost durability but still stands. Carries the updated
    /// tile for the block-updated broadcast.
    Progress(Tile),
    /// The tile broke down to grass, dropping resources.
    Destroyed {
        tile: Tile,
        drop: Option<(Item, u32)>,
    },
}

/// Why a mining attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MineReject {
    #[error("target is out of bounds")]
    OutOfBounds,
    #[error("{tool:?} cannot mine {kind:?}")]
    Ineffective { tool: ToolKind, kind: TileKind },
}

/// Why a placement attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceReject {
    #[error("target is out of bounds")]
    OutOfBounds,
    #[error("{0:?} cannot be placed")]
    NotPlaceable(TileKind),
    #[error("target tile is not empty ground")]
    TargetNotGrass,
    #[error("the tile below cannot support a block")]
    NoSupport,
    #[error("not enough {0:?} in inventory")]
    MissingResource(Item),
}

/// Resource yield stamped on player-placed tiles.
const PLACED_YIELD: u32 = 1;

/// Applies one tool hit to the tile at `pos`.
///
/// Efficiency comes from the fixed (tool, kind) table; zero efficiency
/// rejects the hit outright. Tiles with a missing durability profile
/// are initialized lazily so placed and generated tiles behave the
/// same. Reaching zero durability converts the tile to grass and rolls
/// the drop.
pub fn mine<R: Rng + ?Sized>(
    map: &mut TileMap,
    pos: Position,
    tool: ToolKind,
    rng: &mut R,
) -> Result<MineOutcome, MineReject> {
    let tile = map.tile_mut(pos).ok_or(MineReject::OutOfBounds)?;
    let kind = tile.kind;
    let efficiency = tool.efficiency(kind);
    if efficiency == 0 {
        return Err(MineReject::Ineffective { tool, kind });
    }

    tile.ensure_durability();
    tile.current_durability = tile.current_durability.saturating_sub(efficiency);
    tile.mining_progress =
        (tile.max_durability - tile.current_durability) as f32
            / tile.max_durability as f32;

    if tile.current_durability > 0 {
        return Ok(MineOutcome::Progress(tile.clone()));
    }

    let drop = kind
        .resource()
        .map(|item| (item, rng.random_range(kind.drop_range())));
    let grass = Tile::grass();
    map.set(pos, grass.clone());
    Ok(MineOutcome::Destroyed { tile: grass, drop })
}

/// Places a block of `kind` at `pos`, consuming its resource from the
/// player's inventory.
///
/// Accepted iff the kind is placeable, the target is grass, the tile
/// below it can support a block, and the player holds the resource.
pub fn place(
    map: &mut TileMap,
    player: &mut Player,
    pos: Position,
    kind: TileKind,
) -> Result<Tile, PlaceReject> {
    if !kind.is_placeable() {
        return Err(PlaceReject::NotPlaceable(kind));
    }
    let target = map.tile(pos).ok_or(PlaceReject::OutOfBounds)?;
    if target.kind != TileKind::Grass {
        return Err(PlaceReject::TargetNotGrass);
    }
    let below = Position::new(pos.x, pos.y + 1);
    let supported = map
        .tile(below)
        .is_some_and(|t| t.kind.is_supporting());
    if !supported {
        return Err(PlaceReject::NoSupport);
    }

    // Every placeable kind has a resource; the allow-list check above
    // guarantees the unwrap-free path here.
    let Some(resource) = kind.resource() else {
        return Err(PlaceReject::NotPlaceable(kind));
    };
    if !player.remove_item(resource, 1) {
        return Err(PlaceReject::MissingResource(resource));
    }

    let tile = Tile::new(kind, PLACED_YIELD);
    map.set(pos, tile.clone());
    Ok(tile)
}
