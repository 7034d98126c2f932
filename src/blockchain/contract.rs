//! Typed binding for the ModredIP registry contract.

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract ModredIP {
        /// ERC-721 transfer; the mint emitted by `registerIP` carries the new token id.
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function registerIP(string ipHash, string metadata, bool isEncrypted) external returns (uint256);

        function mintLicense(
            uint256 tokenId,
            uint256 royaltyPercentage,
            uint256 duration,
            bool commercialUse,
            string terms
        ) external returns (uint256);

        function payRevenue(uint256 tokenId) external payable;

        function claimRoyalties(uint256 tokenId) external;

        function getIPAsset(uint256 tokenId) external view returns (
            address owner,
            string ipHash,
            string metadata,
            bool isEncrypted,
            bool isDisputed,
            uint256 registrationDate,
            uint256 totalRevenue,
            uint256 royaltyTokens
        );

        function getLicense(uint256 licenseId) external view returns (
            address licensee,
            uint256 tokenId,
            uint256 royaltyPercentage,
            uint256 duration,
            uint256 startDate,
            bool isActive,
            bool commercialUse,
            string terms
        );

        function nextTokenId() external view returns (uint256);

        function nextLicenseId() external view returns (uint256);
    }
}
