//! Pixel-silhouette collision between agents and obstacle segments
//!
//! Bounding boxes would report hits in the transparent corners of the agent
//! sprite, so every test goes through [`Mask::overlap`].

use glam::IVec2;

use crate::entity::AgentBody;
use crate::sprite::{Mask, Silhouettes};
use crate::world::Obstacle;

/// Which half of an obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Top,
    Bottom,
}

/// First overlapping pixel, in agent mask coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub segment: Segment,
    pub point: IVec2,
}

/// Tests agents against obstacles using a shared silhouette set
#[derive(Debug, Clone, Copy)]
pub struct CollisionDetector<'a> {
    silhouettes: &'a Silhouettes,
}

impl<'a> CollisionDetector<'a> {
    pub fn new(silhouettes: &'a Silhouettes) -> Self {
        Self { silhouettes }
    }

    /// Offset of a segment origin relative to the agent's mask origin
    fn offset(agent: &AgentBody, obstacle: &Obstacle, segment_y: i32) -> IVec2 {
        IVec2::new(
            obstacle.x.round() as i32 - agent.x.round() as i32,
            segment_y - agent.y.round() as i32,
        )
    }

    fn agent_mask(&self, agent: &AgentBody) -> &'a Mask {
        self.silhouettes.agent_frame(agent.frame())
    }

    /// Overlap against a single segment
    pub fn segment_contact(
        &self,
        agent: &AgentBody,
        obstacle: &Obstacle,
        segment: Segment,
    ) -> Option<Contact> {
        let (mask, segment_y) = match segment {
            Segment::Top => (&self.silhouettes.obstacle_top, obstacle.top_origin()),
            Segment::Bottom => (&self.silhouettes.obstacle_bottom, obstacle.bottom_origin()),
        };
        let offset = Self::offset(agent, obstacle, segment_y);
        self.agent_mask(agent)
            .overlap(mask, offset)
            .map(|point| Contact { segment, point })
    }

    /// First contact with either segment, bottom checked first
    pub fn contact(&self, agent: &AgentBody, obstacle: &Obstacle) -> Option<Contact> {
        self.segment_contact(agent, obstacle, Segment::Bottom)
            .or_else(|| self.segment_contact(agent, obstacle, Segment::Top))
    }

    #[inline]
    pub fn collides(&self, agent: &AgentBody, obstacle: &Obstacle) -> bool {
        self.contact(agent, obstacle).is_some()
    }
}
